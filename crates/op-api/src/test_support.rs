//! Fixtures shared by the representer tests

use chrono::{NaiveDate, TimeZone, Utc};
use op_auth::CurrentUser;
use op_core::config::AppConfig;
use op_core::traits::Id;
use op_models::{InMemoryWorkPackageStore, Priority, Project, Status, Type, User, WorkPackage, WorkflowTable};
use std::sync::Arc;

use crate::context::RepresenterContext;

pub const PROJECT_ID: Id = 1;
pub const USER_ID: Id = 5;

pub fn project() -> Project {
    Project::new("demo", "Demo Project").with_id(PROJECT_ID)
}

pub fn task_type() -> Type {
    Type::new("Task").with_id(1)
}

pub fn status_new() -> Status {
    let mut status = Status::new("New").with_id(1, 1);
    status.is_default = true;
    status
}

pub fn status_in_progress() -> Status {
    Status::new("In Progress").with_id(2, 2)
}

pub fn status_closed() -> Status {
    let mut status = Status::new("Closed").with_id(3, 3);
    status.is_closed = true;
    status.default_done_ratio = Some(100);
    status
}

pub fn priority_normal() -> Priority {
    let mut priority = Priority::new("Normal").with_id(1, 1);
    priority.is_default = true;
    priority
}

pub fn priority_high() -> Priority {
    Priority::new("High").with_id(2, 2)
}

pub fn author() -> User {
    User::new(2, "jdoe", "John", "Doe")
}

pub fn assignee() -> User {
    User::new(3, "asmith", "Anna", "Smith")
}

/// Work package 42 as stored: status New, priority Normal
pub fn work_package() -> WorkPackage {
    let mut wp = WorkPackage::new("Write the docs", project(), task_type()).with_id(42);
    wp.description = Some("First *draft*".to_string());
    wp.set_status(status_new());
    wp.set_priority(priority_normal());
    wp.set_author(author());
    wp.start_date = NaiveDate::from_ymd_opt(2015, 3, 2);
    wp.estimated_hours = Some(6.0);
    wp.done_ratio = 40;
    wp.lock_version = Some(3);
    wp.created_at = Utc.with_ymd_and_hms(2015, 3, 1, 10, 0, 0).single();
    wp.updated_at = Utc.with_ymd_and_hms(2015, 3, 2, 8, 30, 0).single();
    wp.changes_applied();
    wp
}

/// Tasks go New -> In Progress -> Closed
pub fn workflow() -> WorkflowTable {
    let mut workflow = WorkflowTable::new();
    workflow
        .add_status(status_new())
        .add_status(status_in_progress())
        .add_status(status_closed())
        .allow(1, 1, 2)
        .allow(1, 2, 3);
    workflow
}

/// User `USER_ID` holding `permissions` in the demo project
pub fn member(permissions: &[&str]) -> CurrentUser {
    CurrentUser::new(USER_ID, "member", "member@example.net").with_project_permissions(PROJECT_ID, permissions)
}

pub fn admin() -> CurrentUser {
    CurrentUser::admin(9, "admin", "admin@example.net")
}

/// Anonymous user, default configuration, empty store
pub fn context() -> RepresenterContext {
    context_with(CurrentUser::anonymous(), Arc::new(InMemoryWorkPackageStore::new()))
}

pub fn context_for(permissions: &[&str]) -> RepresenterContext {
    context_with_user(member(permissions))
}

pub fn context_with_user(user: CurrentUser) -> RepresenterContext {
    context().with_current_user(user)
}

pub fn context_with(user: CurrentUser, store: Arc<InMemoryWorkPackageStore>) -> RepresenterContext {
    RepresenterContext::new(
        Arc::new(user),
        &AppConfig::default(),
        Arc::new(workflow()),
        store,
    )
}
