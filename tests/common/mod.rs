#![allow(dead_code)]

use chrono::Utc;
use mockito::Matcher;
use serde_json::{json, Value};

// Canned payloads mirroring what the public demo instance serves.

pub fn support() -> Value {
    json!({
        "url": "https://reqres.in/#support-heading",
        "text": "To keep ReqRes free, contributions towards server costs are appreciated!"
    })
}

fn user(id: u32, email: &str, first_name: &str, last_name: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "first_name": first_name,
        "last_name": last_name,
        "avatar": format!("https://reqres.in/img/faces/{}-image.jpg", id),
    })
}

pub fn george() -> Value {
    user(1, "george.bluth@reqres.in", "George", "Bluth")
}

pub fn janet() -> Value {
    user(2, "janet.weaver@reqres.in", "Janet", "Weaver")
}

pub fn emma() -> Value {
    user(3, "emma.wong@reqres.in", "Emma", "Wong")
}

pub fn users_page(per_page: u32, total_pages: u32, data: Vec<Value>) -> Value {
    json!({
        "page": 1,
        "per_page": per_page,
        "total": 12,
        "total_pages": total_pages,
        "data": data,
        "support": support(),
    })
}

pub fn users_page_single() -> Value {
    users_page(1, 12, vec![george()])
}

pub fn users_page_of_ten() -> Value {
    users_page(10, 2, vec![george(), janet(), emma()])
}

pub fn user_envelope(user: Value) -> Value {
    json!({"data": user, "support": support()})
}

fn resource(id: u32, name: &str, year: i32, color: &str, pantone_value: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "year": year,
        "color": color,
        "pantone_value": pantone_value,
    })
}

pub fn cerulean() -> Value {
    resource(1, "cerulean", 2000, "#98B2D1", "15-4020")
}

pub fn fuchsia_rose() -> Value {
    resource(2, "fuchsia rose", 2001, "#C74375", "17-2031")
}

pub fn true_red() -> Value {
    resource(3, "true red", 2002, "#BF1932", "19-1664")
}

pub fn resources_page(per_page: u32, total_pages: u32, data: Vec<Value>) -> Value {
    json!({
        "page": 1,
        "per_page": per_page,
        "total": 12,
        "total_pages": total_pages,
        "data": data,
        "support": support(),
    })
}

pub fn resources_page_single() -> Value {
    resources_page(1, 12, vec![cerulean()])
}

pub fn resources_page_of_ten() -> Value {
    resources_page(10, 2, vec![cerulean(), fuchsia_rose(), true_red()])
}

pub fn resource_envelope(resource: Value) -> Value {
    json!({"data": resource, "support": support()})
}

/// A timestamp the drift assertion accepts as fresh.
pub fn recent_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub fn created_user(name: &str, job: &str) -> Value {
    json!({
        "name": name,
        "job": job,
        "id": "713",
        "createdAt": recent_timestamp(),
    })
}

pub fn update_receipt() -> Value {
    json!({"updatedAt": recent_timestamp()})
}

pub fn page_query(page: u32, per_page: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("page".into(), page.to_string()),
        Matcher::UrlEncoded("per_page".into(), per_page.to_string()),
    ])
}
