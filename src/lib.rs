// Copyright 2025 The RestAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use std::fmt::Display;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::info;

pub mod assertions;
pub mod client;
pub mod compare;
pub mod config;
pub mod models;

pub use compare::path::FieldPath;
pub use compare::{
    compare, compare_with, try_parse_int, IgnoreSet, MismatchKind, Recordable, Side,
    StructuralMismatch,
};

use crate::client::ApiClient;
use crate::models::{ApiError, CreatedUser, Credentials, NewUser, UserEnvelope, UsersPage};

/// Builder for a canned smoke run against a live instance of the demo
/// service.
///
/// The run hits a handful of endpoints and checks each response both
/// against its typed model and structurally, with [`compare_with`]. Extra
/// ignored fields can be added for service deployments that decorate
/// responses with volatile fields.
///
/// # Examples
///
/// ```
/// use rest_assert::RestAssert;
///
/// async fn smoke() {
///     let report = RestAssert::new()
///         .with_url("http://localhost:8080")
///         .ignore_field("avatar")
///         .run()
///         .await;
///     println!("{}", report);
/// }
/// ```
pub struct RestAssert<'a> {
    url: Option<&'a str>,
    ignore: IgnoreSet,
}

impl<'a> RestAssert<'a> {
    /// Constructs a new, empty `RestAssert` builder.
    pub fn new() -> Self {
        Self {
            url: None,
            ignore: IgnoreSet::new(),
        }
    }

    /// Sets the base URL to run against.
    ///
    /// # Examples
    ///
    /// ```
    /// # #![allow(unused_mut)]
    /// use rest_assert::RestAssert;
    /// let mut rest_assert = RestAssert::new().with_url("http://localhost:8080");
    /// ```
    pub fn with_url(mut self, url: &'a str) -> Self {
        self.url = Some(url);
        self
    }

    /// Excludes a field name from all structural comparisons of the run,
    /// at every nesting depth.
    pub fn ignore_field(mut self, name: impl Into<String>) -> Self {
        self.ignore = self.ignore.field(name);
        self
    }

    /// Runs the checks and reports how they went.
    ///
    /// Every check runs even when an earlier one fails; transport errors
    /// count as failures of the check they occurred in.
    ///
    /// # Panics
    ///
    /// Panics when no base URL was set.
    pub async fn run(mut self) -> SuiteReport {
        let url = self.url.take().expect("base URL is required");
        let client = ApiClient::new(url);
        info!(base_url = client.base_url(), "running smoke checks");

        let results = [
            ("GET /users", check_users_page(&client, &self.ignore).await),
            ("GET /users/2", check_single_user(&client, &self.ignore).await),
            ("POST /users", check_create_echo(&client, &self.ignore).await),
            ("POST /register", check_register_guard(&client).await),
        ];

        let mut total_count = 0;
        let mut failed_count = 0;
        let mut summary = String::new();
        let mut failures = String::new();

        for (id, outcome) in results {
            total_count += 1;
            match outcome {
                Ok(()) => summary.push_str(format!("{} ✅\n", id).as_str()),
                Err(err) => {
                    summary.push_str(format!("{} ❌\n", id).as_str());
                    failures.push_str(format!("-------------\n{}: {}\n", id, err).as_str());
                    failed_count += 1;
                }
            }
        }

        SuiteReport {
            total_count,
            failed_count,
            summary,
            failures: (failed_count > 0).then_some(failures),
        }
    }
}

impl<'a> Default for RestAssert<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// The page listing must be consistent with itself and covered by the
/// typed model.
async fn check_users_page(client: &ApiClient, ignore: &IgnoreSet) -> Result<(), String> {
    let response = client.get_users(1, 3).await.map_err(|err| err.to_string())?;
    assertions::assert_status(&response, StatusCode::OK)?;
    assertions::assert_content_type(&response, assertions::JSON_CONTENT_TYPE)?;

    let raw: Value = response.json().await.map_err(|err| err.to_string())?;
    let page: UsersPage = serde_json::from_value(raw.clone())
        .map_err(|err| format!("users page does not fit the model: {}", err))?;

    if page.page != 1 {
        return Err(format!("asked for page 1, got page {}", page.page));
    }
    if page.data.len() > page.per_page as usize {
        return Err(format!(
            "page holds {} users, more than per_page {}",
            page.data.len(),
            page.per_page
        ));
    }

    // Re-serializing the model and comparing it against the raw payload
    // surfaces any field the model does not know about.
    compare_with(&raw, &page, ignore).map_err(|err| err.to_string())
}

async fn check_single_user(client: &ApiClient, ignore: &IgnoreSet) -> Result<(), String> {
    let response = client.get_user(2).await.map_err(|err| err.to_string())?;
    assertions::assert_status(&response, StatusCode::OK)?;

    let raw: Value = response.json().await.map_err(|err| err.to_string())?;
    let envelope: UserEnvelope = serde_json::from_value(raw.clone())
        .map_err(|err| format!("user envelope does not fit the model: {}", err))?;

    if envelope.data.id != 2 {
        return Err(format!("asked for user 2, got user {}", envelope.data.id));
    }

    compare_with(&raw, &envelope, ignore).map_err(|err| err.to_string())
}

/// A created user must echo the posted fields, with only the
/// server-assigned ones on top.
async fn check_create_echo(client: &ApiClient, ignore: &IgnoreSet) -> Result<(), String> {
    let posted = NewUser::new("morpheus", "leader");
    let response = client
        .create_user(&posted)
        .await
        .map_err(|err| err.to_string())?;
    assertions::assert_status(&response, StatusCode::CREATED)?;

    let created: CreatedUser = response
        .json()
        .await
        .map_err(|err| format!("created user does not fit the model: {}", err))?;
    assertions::assert_recent_timestamp(&created.created_at, assertions::UPDATE_TOLERANCE)?;

    let ignore = ignore.clone().field("id").field("createdAt");
    compare_with(&created, &posted, &ignore).map_err(|err| err.to_string())
}

async fn check_register_guard(client: &ApiClient) -> Result<(), String> {
    let creds = Credentials::without_password("sydney@fife");
    let response = client
        .register(&creds)
        .await
        .map_err(|err| err.to_string())?;
    assertions::assert_status(&response, StatusCode::BAD_REQUEST)?;

    let error: ApiError = response
        .json()
        .await
        .map_err(|err| format!("error body does not fit the model: {}", err))?;
    if error.error != "Missing password" {
        return Err(format!(
            "expected 'Missing password', got '{}'",
            error.error
        ));
    }
    Ok(())
}

/// Report of a smoke run.
///
/// Holds the per-check summary and, for failed runs, the detailed failure
/// messages. The [`Display`] form is the human-readable report.
pub struct SuiteReport {
    total_count: usize,
    failed_count: usize,
    summary: String,
    failures: Option<String>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.failed_count == 0
    }

    pub fn total(&self) -> usize {
        self.total_count
    }

    pub fn failed(&self) -> usize {
        self.failed_count
    }
}

impl Display for SuiteReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.failures {
            Some(failures) => write!(
                f,
                "{} checks\n{}\nfailures:\n{}\ncheck result: FAILED. {} passed; {} failed",
                self.total_count,
                self.summary,
                failures,
                self.total_count - self.failed_count,
                self.failed_count
            ),
            None => write!(
                f,
                "{} checks\n{}\ncheck result: PASSED. {} passed; 0 failed",
                self.total_count, self.summary, self.total_count
            ),
        }
    }
}
