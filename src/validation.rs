use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    data_formats::{
        CommentRequest, CreateArticleRequest, LoginRequest, RegisterRequest,
        UpdateArticleRequest, UpdateUserRequest,
    },
    errors::RequestError,
    slugify,
};

const MAX_TEXT_LENGTH: usize = 2048;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"(?i)\A[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\z"
    )
    .expect("email pattern compiles");
    static ref USERNAME_RE: Regex =
        Regex::new(r"\A[A-Za-z0-9]+\z").expect("username pattern compiles");
}

/// Field level failures, rendered as `{"errors": {"<field>": ["<message>"]}}`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    fn into_result(self) -> Result<(), RequestError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(RequestError::Validation(self))
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), RequestError>;
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), RequestError> {
        let mut errors = ValidationErrors::new();
        check_username(&mut errors, &self.username);
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors.into_result()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), RequestError> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors.into_result()
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), RequestError> {
        let mut errors = ValidationErrors::new();
        if let Some(username) = &self.username {
            check_username(&mut errors, username);
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, email);
        }
        if let Some(password) = &self.password {
            check_password(&mut errors, password);
        }
        if let Some(bio) = &self.bio {
            check_max_length(&mut errors, "bio", bio);
        }
        errors.into_result()
    }
}

impl Validate for CreateArticleRequest {
    fn validate(&self) -> Result<(), RequestError> {
        let mut errors = ValidationErrors::new();
        check_title(&mut errors, &self.title);
        check_max_length(&mut errors, "description", &self.description);
        check_body(&mut errors, &self.body);
        check_tags(&mut errors, &self.tag_list);
        errors.into_result()
    }
}

impl Validate for UpdateArticleRequest {
    fn validate(&self) -> Result<(), RequestError> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }
        if let Some(description) = &self.description {
            check_max_length(&mut errors, "description", description);
        }
        if let Some(body) = &self.body {
            check_body(&mut errors, body);
        }
        if let Some(tags) = &self.tag_list {
            check_tags(&mut errors, tags);
        }
        errors.into_result()
    }
}

impl Validate for CommentRequest {
    fn validate(&self) -> Result<(), RequestError> {
        let mut errors = ValidationErrors::new();
        check_body(&mut errors, &self.body);
        errors.into_result()
    }
}

fn check_username(errors: &mut ValidationErrors, username: &str) {
    let length = username.chars().count();
    if !(4..=255).contains(&length) {
        errors.add("username", "must be between 4 and 255 characters");
    } else if !USERNAME_RE.is_match(username) {
        errors.add("username", "must contain only letters and digits");
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if !is_valid_email(email) {
        errors.add("email", "is invalid");
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str) {
    if !(8..=255).contains(&password.chars().count()) {
        errors.add("password", "must be between 8 and 255 characters");
    }
}

fn check_title(errors: &mut ValidationErrors, title: &str) {
    if title.trim().chars().count() < 4 {
        errors.add("title", "must be at least 4 characters");
    } else if slugify(title).is_empty() {
        errors.add("title", "must contain letters or digits");
    }
}

fn check_body(errors: &mut ValidationErrors, body: &str) {
    if body.trim().is_empty() {
        errors.add("body", "can't be blank");
    } else {
        check_max_length(errors, "body", body);
    }
}

fn check_max_length(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.chars().count() > MAX_TEXT_LENGTH {
        errors.add(field, format!("must be at most {MAX_TEXT_LENGTH} characters"));
    }
}

fn check_tags(errors: &mut ValidationErrors, tags: &[String]) {
    if tags.iter().any(|tag| tag.trim().is_empty()) {
        errors.add("tagList", "tags can't be blank");
    }
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
