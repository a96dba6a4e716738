//! Resource DTOs - request and response shapes for the resource endpoints

use crate::core::validation::{FieldIssue, RawRequest, RequestSchema, section_issues};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

const RESOURCE_FIELDS: &[&str] = &["name", "description", "category"];

lazy_static! {
    static ref ID_PATTERN: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// Body of `POST /`. Fields are optional at the type level so a missing one
/// is reported as `Required` by the validator instead of a parse error.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct CreateResourceDTO {
    #[validate(
        required(message = "Required"),
        length(min = 3, message = "Name must be at least 3 characters long")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Required"),
        length(min = 10, message = "Description must be at least 10 characters long")
    )]
    pub description: Option<String>,

    #[validate(
        required(message = "Required"),
        length(min = 2, message = "Category must be at least 2 characters long")
    )]
    pub category: Option<String>,
}

/// Body of `PUT /{id}`; only supplied fields are changed and unknown keys are rejected
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateResourceDTO {
    #[validate(length(min = 3, message = "Name must be at least 3 characters long"))]
    pub name: Option<String>,

    #[validate(length(min = 10, message = "Description must be at least 10 characters long"))]
    pub description: Option<String>,

    #[validate(length(min = 2, message = "Category must be at least 2 characters long"))]
    pub category: Option<String>,
}

impl UpdateResourceDTO {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.category.is_none()
    }
}

/// Fully populated input for the repository insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResourceDTO {
    pub name: String,
    pub description: String,
    pub category: String,
}

/// Path parameters of `/{id}` routes, still as text
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ResourceIdParams {
    #[validate(regex(path = *ID_PATTERN, message = "ID must be a numeric string"))]
    pub id: String,
}

/// Response of `DELETE /{id}`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    pub message: String,
}

// ************************* REQUEST SCHEMAS ************************* //

#[derive(Debug, Validate)]
pub struct CreateResourceRequest {
    #[validate(nested)]
    pub body: CreateResourceDTO,
}

impl RequestSchema for CreateResourceRequest {
    fn from_raw(raw: &RawRequest) -> Result<Self, Vec<FieldIssue>> {
        let nulls = raw.body_nulls(RESOURCE_FIELDS);
        if !nulls.is_empty() {
            return Err(nulls);
        }
        raw.body::<CreateResourceDTO>()
            .map(|body| Self { body })
            .map_err(|issue| vec![issue])
    }
}

#[derive(Debug, Validate)]
pub struct UpdateResourceRequest {
    #[validate(nested)]
    pub params: ResourceIdParams,
    #[validate(nested)]
    pub body: UpdateResourceDTO,
}

impl RequestSchema for UpdateResourceRequest {
    fn from_raw(raw: &RawRequest) -> Result<Self, Vec<FieldIssue>> {
        let params = raw.params::<ResourceIdParams>();

        let nulls = raw.body_nulls(RESOURCE_FIELDS);
        if !nulls.is_empty() {
            let mut issues = section_issues("params", &params);
            issues.extend(nulls);
            return Err(issues);
        }

        let body = raw.body::<UpdateResourceDTO>();
        match (params, body) {
            (Ok(params), Ok(body)) => Ok(Self { params, body }),
            (params, body) => {
                // report the section that did parse alongside the one that did not
                let mut issues = section_issues("params", &params);
                issues.extend(section_issues("body", &body));
                Err(issues)
            }
        }
    }
}

/// Shared by `GET /{id}` and `DELETE /{id}`
#[derive(Debug, Validate)]
pub struct ResourceIdRequest {
    #[validate(nested)]
    pub params: ResourceIdParams,
}

impl RequestSchema for ResourceIdRequest {
    fn from_raw(raw: &RawRequest) -> Result<Self, Vec<FieldIssue>> {
        raw.params::<ResourceIdParams>()
            .map(|params| Self { params })
            .map_err(|issue| vec![issue])
    }
}
