use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{ActiveValue::Set, DbBackend, EntityTrait, QueryTrait};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::entity::prelude::*;
use crate::errors::Result;
use crate::evaluation::Evaluator;
use crate::models::users::entities::UserRole;
use crate::storage::{Storage, Store, StoreOptions, StoreTransaction};

pub struct StartupContext {
    pub store: Store,
    pub storage: Arc<dyn Storage>,
    pub evaluator: Arc<Evaluator>,
}

// (邮箱, 密码, 姓名, 角色)
const SEED_USERS: [(&str, &str, &str, UserRole); 5] = [
    ("admin@uni.edu", "admin123", "Admin User", UserRole::Admin),
    ("faculty1@uni.edu", "faculty123", "Dr. Jane Smith", UserRole::Faculty),
    ("student1@uni.edu", "student123", "Alice Johnson", UserRole::Student),
    ("student2@uni.edu", "student123", "Bob Williams", UserRole::Student),
    ("student3@uni.edu", "student123", "Carol Davis", UserRole::Student),
];

// (课程代码, 课程名)
const SEED_COURSES: [(&str, &str); 3] = [
    ("CS101", "Introduction to Computer Science"),
    ("CS201", "Web Development"),
    ("CS301", "Database Systems"),
];

// (课程下标, 标题, 说明, 截止天数)
const SEED_ASSIGNMENTS: [(usize, &str, &str, i64); 3] = [
    (0, "Assignment 1 - Basics", "Submit a short program.", 7),
    (0, "Assignment 2 - Loops", "Implement loop examples.", 14),
    (1, "Portfolio Website", "Create a simple portfolio.", 10),
];

// (标题, 说明, 距今天数)
const SEED_EVENTS: [(&str, &str, i64); 3] = [
    ("Annual Tech Fest", "Join us for the annual technology festival.", 5),
    ("Guest Lecture: AI in Education", "Room 101, 2 PM.", 3),
    ("Semester Registration Opens", "Register for next semester.", 1),
];

fn days_from_today(days: i64) -> String {
    (Utc::now() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

async fn insert(txn: &StoreTransaction, stmt: sea_orm::Statement) -> Result<i64> {
    Ok(txn.mutate(stmt).await?.last_insert_id() as i64)
}

/// 首次启动时写入演示数据
///
/// 只在用户表为空时执行，全部写入在一个事务内；返回是否写入。
pub async fn seed_campus(store: &Store) -> Result<bool> {
    let count = store.count_users().await?;
    if count > 0 {
        debug!("Store already has {} user(s), skipping seed", count);
        return Ok(false);
    }

    info!("No users found, seeding campus data...");

    store
        .transaction(|txn| {
            Box::pin(async move {
                let mut student_ids = Vec::new();
                for (email, password, name, role) in SEED_USERS {
                    let id = insert(
                        txn,
                        Users::insert(UserActiveModel {
                            email: Set(email.to_string()),
                            password: Set(password.to_string()),
                            name: Set(name.to_string()),
                            role: Set(role.to_string()),
                            ..Default::default()
                        })
                        .build(DbBackend::Sqlite),
                    )
                    .await?;
                    if role == UserRole::Student {
                        student_ids.push(id);
                    }
                }

                let mut course_ids = Vec::new();
                for (code, name) in SEED_COURSES {
                    let id = insert(
                        txn,
                        Courses::insert(CourseActiveModel {
                            name: Set(name.to_string()),
                            code: Set(code.to_string()),
                            ..Default::default()
                        })
                        .build(DbBackend::Sqlite),
                    )
                    .await?;
                    course_ids.push(id);
                }

                for &student_id in &student_ids {
                    for &course_id in &course_ids {
                        insert(
                            txn,
                            Enrollments::insert(EnrollmentActiveModel {
                                user_id: Set(student_id),
                                course_id: Set(course_id),
                                ..Default::default()
                            })
                            .build(DbBackend::Sqlite),
                        )
                        .await?;
                    }
                }

                for (course, title, description, due_in) in SEED_ASSIGNMENTS {
                    insert(
                        txn,
                        Assignments::insert(AssignmentActiveModel {
                            course_id: Set(course_ids[course]),
                            title: Set(title.to_string()),
                            description: Set(Some(description.to_string())),
                            due_date: Set(Some(days_from_today(due_in))),
                            ..Default::default()
                        })
                        .build(DbBackend::Sqlite),
                    )
                    .await?;
                }

                let now = Utc::now().timestamp();
                for (title, description, in_days) in SEED_EVENTS {
                    insert(
                        txn,
                        Events::insert(EventActiveModel {
                            title: Set(title.to_string()),
                            description: Set(Some(description.to_string())),
                            event_date: Set(Some(days_from_today(in_days))),
                            created_at: Set(now),
                            ..Default::default()
                        })
                        .build(DbBackend::Sqlite),
                    )
                    .await?;
                }

                Ok(())
            })
        })
        .await?;

    info!(
        "Seeded {} users, {} courses, {} assignments, {} events",
        SEED_USERS.len(),
        SEED_COURSES.len(),
        SEED_ASSIGNMENTS.len(),
        SEED_EVENTS.len()
    );
    Ok(true)
}

/// 准备启动上下文
/// 包括存储、演示数据和评分器
pub async fn prepare_startup(config: &AppConfig) -> Result<StartupContext> {
    let store = Store::open(StoreOptions::from_config(&config.database)).await?;
    warn!(
        "Store opened from {} and migrations completed",
        store.snapshot_path().display()
    );

    seed_campus(&store).await?;
    // 即使没有新写入，也确认快照路径可写
    store.flush().await?;

    let evaluator = Arc::new(Evaluator::from_config(&config.evaluation));
    let storage: Arc<dyn Storage> = Arc::new(store.clone());

    Ok(StartupContext {
        store,
        storage,
        evaluator,
    })
}
