// src/services/users.rs

//! User and employee administration.

use reqwest::{Method, RequestBuilder};

use crate::error::Result;
use crate::models::{NewUser, User};
use crate::services::ApiClient;

#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.api.get_json("/users").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        self.api.send_json(self.create_request("/users", user)?).await
    }

    pub async fn list_employees(&self) -> Result<Vec<User>> {
        self.api.get_json("/users/employees").await
    }

    pub async fn create_employee(&self, user: &NewUser) -> Result<User> {
        self.api
            .send_json(self.create_request("/users/employees", user)?)
            .await
    }

    fn create_request(&self, path: &str, user: &NewUser) -> Result<RequestBuilder> {
        self.api.json_request(Method::POST, path, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::services::client::tests::{client, json_body};

    #[test]
    fn test_create_employee_request() {
        let users = UserService::new(client());
        let employee = NewUser {
            email: "ana@example.com".into(),
            password: "s3cret!".into(),
            first_name: "Ana".into(),
            last_name: "Pop".into(),
            role: Some(Role::Employee),
        };
        let request = users
            .create_request("/users/employees", &employee)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().path(), "/api/users/employees");
        let body = json_body(&request);
        assert_eq!(body["firstName"], "Ana");
        assert_eq!(body["role"], "EMPLOYEE");
    }
}
