// src/api/lectures.rs

use reqwest::Method;
use validator::Validate;

use crate::{
    api::ApiClient,
    error::ClientError,
    models::lecture::{CreateLectureRequest, Lecture},
};

impl ApiClient {
    /// Lists all lectures in course order.
    pub async fn list_lectures(&self) -> Result<Vec<Lecture>, ClientError> {
        let mut lectures: Vec<Lecture> = self.get("/lectures/").await?;
        lectures.sort_by_key(|l| l.order);
        Ok(lectures)
    }

    pub async fn get_lecture(&self, id: i64) -> Result<Lecture, ClientError> {
        self.get(&format!("/lectures/{}", id)).await
    }

    pub async fn create_lecture(&self, req: &CreateLectureRequest) -> Result<Lecture, ClientError> {
        req.validate()?;
        let lecture: Lecture = self.post("/lectures", req).await?;
        tracing::info!("Created lecture {} '{}'", lecture.id, lecture.title);
        Ok(lecture)
    }

    pub async fn delete_lecture(&self, id: i64) -> Result<(), ClientError> {
        self.command(Method::DELETE, &format!("/lectures/{}", id))
            .await?;
        tracing::info!("Deleted lecture {}", id);
        Ok(())
    }
}
