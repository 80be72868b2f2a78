//! HTTP Task Service
//!
//! reqwest client for the JSON REST endpoint:
//!
//! | op     | method | path                  |
//! |--------|--------|-----------------------|
//! | list   | GET    | `/todos?_limit={n}`   |
//! | create | POST   | `/todos`              |
//! | update | PUT    | `/todos/{id}`         |
//! | delete | DELETE | `/todos/{id}`         |

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};

use super::TaskService;
use crate::config::ServiceConfig;
use crate::domain::{NewTask, Task, TaskError, TaskId, TaskResult};

/// Remote task service over HTTP
#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: Client,
    config: ServiceConfig,
}

impl Default for HttpTaskService {
    fn default() -> Self {
        Self::with_config(ServiceConfig::default())
    }
}

impl HttpTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn task_url(&self, id: TaskId) -> String {
        self.config.url(&format!("/todos/{}", id))
    }
}

/// Turn a non-success status into `TaskError::Status`
fn check_status(response: Response) -> TaskResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TaskError::Status {
            status: status.as_u16(),
        })
    }
}

#[async_trait(?Send)]
impl TaskService for HttpTaskService {
    async fn list(&self) -> TaskResult<Vec<Task>> {
        debug!("GET /todos?_limit={}", self.config.page_limit);
        let response = self
            .client
            .get(self.config.url("/todos"))
            .query(&[("_limit", self.config.page_limit)])
            .send()
            .await?;
        let tasks = check_status(response)?.json::<Vec<Task>>().await?;
        debug!("Listed {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn create(&self, task: &NewTask) -> TaskResult<Task> {
        debug!("POST /todos title={:?}", task.title);
        let response = self
            .client
            .post(self.config.url("/todos"))
            .json(task)
            .send()
            .await?;
        Ok(check_status(response)?.json::<Task>().await?)
    }

    async fn update(&self, task: &Task) -> TaskResult<Task> {
        debug!("PUT /todos/{} completed={}", task.id, task.completed);
        let response = self
            .client
            .put(self.task_url(task.id))
            .json(task)
            .send()
            .await?;
        Ok(check_status(response)?.json::<Task>().await?)
    }

    async fn delete(&self, id: TaskId) -> TaskResult<()> {
        debug!("DELETE /todos/{}", id);
        let response = self.client.delete(self.task_url(id)).send().await?;
        check_status(response)?;
        Ok(())
    }
}
