/// Integration tests for the todolist API
///
/// These tests drive the full router against PostgreSQL:
/// - Login check, session cookie and notices
/// - Task creation, toggling and deletion with the ownership rule
/// - User administration access and validation
///
/// Database URL should be set via DATABASE_URL environment variable.

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, form_post, get, session_cookie, unique_name, TestContext, TEST_PASSWORD};
use todolist_shared::models::task::{CreateTask, Task};
use todolist_shared::models::user::{Role, UpdateUser, User};
use tower::ServiceExt;

async fn login(ctx: &TestContext, user: &User) -> String {
    let response = ctx
        .app
        .clone()
        .oneshot(form_post(
            "/login",
            &[("_username", user.username.as_str()), ("_password", TEST_PASSWORD)],
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_cookie(&response).expect("login should set the session cookie")
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.app.clone().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");
    assert_eq!(json["migrations_up_to_date"], true);
}

#[tokio::test]
async fn test_login_success_sets_session_and_notice() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(
            "/login",
            &[("_username", user.username.as_str()), ("_password", TEST_PASSWORD)],
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert_eq!(json["notices"][0]["level"], "success");
    assert_eq!(json["notices"][0]["message"], "Connexion réussie !");
}

#[tokio::test]
async fn test_session_identifies_user_on_homepage() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();
    let session = login(&ctx, &user).await;

    let response = ctx.app.clone().oneshot(get("/", Some(session.as_str()))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["username"], user.username.as_str());

    let response = ctx.app.clone().oneshot(get("/", None)).await.unwrap();
    let json = body_json(response).await;
    assert!(json["data"]["user"].is_null());
}

#[tokio::test]
async fn test_login_failure_is_generic() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();
    let unknown = unique_name("ghost");

    for (username, password) in [
        (user.username.as_str(), "wrong password"),
        (unknown.as_str(), TEST_PASSWORD),
    ] {
        let response = ctx
            .app
            .clone()
            .oneshot(form_post(
                "/login",
                &[("_username", username), ("_password", password)],
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
        assert!(session_cookie(&response).is_none());

        let json = body_json(response).await;
        assert_eq!(json["notices"][0]["level"], "error");
        assert_eq!(json["notices"][0]["message"], "Identifiants invalides !");
        assert_eq!(json["last_username"], username);
    }
}

#[tokio::test]
async fn test_anonymous_cannot_create_task() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(
            "/tasks/create",
            &[("title", "Title"), ("content", "Content")],
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_task_create_toggle_delete() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();
    let session = login(&ctx, &user).await;
    let title = unique_name("task");

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(
            "/tasks/create",
            &[("title", title.as_str()), ("content", "Some content")],
            Some(session.as_str()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/tasks");
    let json = body_json(response).await;
    assert_eq!(json["notices"][0]["message"], "La tâche a été bien été ajoutée.");

    let task = Task::list_by_owner(&ctx.db, user.id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.title == title)
        .expect("task should be owned by its creator");
    assert!(!task.is_done);

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(&format!("/tasks/{}/toggle", task.id), &[], None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let json = body_json(response).await;
    assert_eq!(
        json["notices"][0]["message"],
        format!("La tâche {} a bien été marquée comme faite.", title)
    );

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(&format!("/tasks/{}/delete", task.id), &[], Some(session.as_str())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let json = body_json(response).await;
    assert_eq!(json["notices"][0]["level"], "success");
    assert_eq!(json["notices"][0]["message"], "La tâche a bien été supprimée.");

    assert!(Task::find_by_id(&ctx.db, task.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_foreign_task_deletion_is_refused() {
    let ctx = TestContext::new().await.unwrap();
    let owner = ctx.create_user(Role::User).await.unwrap();
    let other = ctx.create_user(Role::User).await.unwrap();
    let session = login(&ctx, &other).await;

    let task = Task::create(
        &ctx.db,
        CreateTask {
            title: unique_name("task"),
            content: "Owned by someone else".to_string(),
            owner_id: Some(owner.id),
        },
    )
    .await
    .unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(&format!("/tasks/{}/delete", task.id), &[], Some(session.as_str())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let json = body_json(response).await;
    assert_eq!(json["notices"][0]["level"], "error");
    assert_eq!(
        json["notices"][0]["message"],
        "Vous n'avez pas les droits pour supprimer cette tâche."
    );

    assert!(Task::find_by_id(&ctx.db, task.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_anonymous_task_deletable_by_any_user() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();
    let session = login(&ctx, &user).await;

    let task = Task::create(
        &ctx.db,
        CreateTask {
            title: unique_name("task"),
            content: "No owner".to_string(),
            owner_id: None,
        },
    )
    .await
    .unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(&format!("/tasks/{}/delete", task.id), &[], Some(session.as_str())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(Task::find_by_id(&ctx.db, task.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_anonymous_cannot_delete_task() {
    let ctx = TestContext::new().await.unwrap();

    let task = Task::create(
        &ctx.db,
        CreateTask {
            title: unique_name("task"),
            content: "No owner".to_string(),
            owner_id: None,
        },
    )
    .await
    .unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(&format!("/tasks/{}/delete", task.id), &[], None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(Task::find_by_id(&ctx.db, task.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_missing_task_is_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(form_post("/tasks/999999999/toggle", &[], None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_list_requires_admin() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();
    let admin = ctx.create_user(Role::Admin).await.unwrap();

    let session = login(&ctx, &user).await;
    let response = ctx.app.clone().oneshot(get("/users", Some(session.as_str()))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let session = login(&ctx, &admin).await;
    let response = ctx.app.clone().oneshot(get("/users", Some(session.as_str()))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let users = json["data"].as_array().unwrap();
    assert!(users.iter().any(|u| u["username"] == admin.username.as_str()));
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn test_user_create_and_duplicate() {
    let ctx = TestContext::new().await.unwrap();
    let username = unique_name("new");
    let email = format!("{}@example.com", username);

    let fields = [
        ("username", username.as_str()),
        ("password", "pass"),
        ("password_confirmation", "pass"),
        ("email", email.as_str()),
    ];

    let response = ctx
        .app
        .clone()
        .oneshot(form_post("/users/create", &fields, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/users");
    let json = body_json(response).await;
    assert_eq!(json["notices"][0]["message"], "L'utilisateur a bien été ajouté.");

    let created = User::find_by_username(&ctx.db, &username).await.unwrap().unwrap();
    assert!(created.has_role(Role::User));
    assert_ne!(created.password_hash, "pass");

    let response = ctx
        .app
        .clone()
        .oneshot(form_post("/users/create", &fields, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_user_create_validation() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(
            "/users/create",
            &[
                ("username", ""),
                ("password", "a"),
                ("password_confirmation", "b"),
                ("email", "not-an-email"),
            ],
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password_confirmation"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();
    let session = login(&ctx, &user).await;

    let response = ctx
        .app
        .clone()
        .oneshot(get("/logout", Some(session.as_str())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");

    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cleared.starts_with("todolist_session="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_form_values_are_percent_decoded() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();
    let session = login(&ctx, &user).await;
    let title = format!("Courses & café = 2 tâches {}", unique_name("t"));

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(
            "/tasks/create",
            &[("title", title.as_str()), ("content", "lait+pain; 100%")],
            Some(session.as_str()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let task = Task::list_by_owner(&ctx.db, user.id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.title == title)
        .expect("title should survive form encoding");
    assert_eq!(task.content, "lait+pain; 100%");
}

#[tokio::test]
async fn test_anonymous_admin_pages_require_sign_in() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();

    let response = ctx.app.clone().oneshot(get("/users", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(
            &format!("/users/{}/edit", user.id),
            &[
                ("username", user.username.as_str()),
                ("password", "pass"),
                ("password_confirmation", "pass"),
                ("email", user.email.as_str()),
            ],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_demoted_admin_loses_access_immediately() {
    let ctx = TestContext::new().await.unwrap();
    let admin = ctx.create_user(Role::Admin).await.unwrap();
    let session = login(&ctx, &admin).await;

    let response = ctx.app.clone().oneshot(get("/users", Some(session.as_str()))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    User::update(
        &ctx.db,
        admin.id,
        UpdateUser {
            roles: Some(vec![Role::User]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let response = ctx.app.clone().oneshot(get("/users", Some(session.as_str()))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deleted_user_session_is_anonymous() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(Role::User).await.unwrap();
    let session = login(&ctx, &user).await;

    assert!(User::delete(&ctx.db, user.id).await.unwrap());

    let response = ctx.app.clone().oneshot(get("/", Some(session.as_str()))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["user"].is_null());

    let response = ctx
        .app
        .clone()
        .oneshot(form_post(
            "/tasks/create",
            &[("title", "Title"), ("content", "Content")],
            Some(session.as_str()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_only_admins_choose_the_role_at_registration() {
    let ctx = TestContext::new().await.unwrap();

    let register = |username: String, session: Option<String>| {
        let app = ctx.app.clone();
        async move {
            let email = format!("{}@example.com", username);
            let response = app
                .oneshot(form_post(
                    "/users/create",
                    &[
                        ("username", username.as_str()),
                        ("password", "pass"),
                        ("password_confirmation", "pass"),
                        ("email", email.as_str()),
                        ("role", "ROLE_ADMIN"),
                    ],
                    session.as_deref(),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
        }
    };

    let self_registered = unique_name("self");
    register(self_registered.clone(), None).await;
    let created = User::find_by_username(&ctx.db, &self_registered).await.unwrap().unwrap();
    assert!(!created.has_role(Role::Admin));
    assert!(created.has_role(Role::User));

    let admin = ctx.create_user(Role::Admin).await.unwrap();
    let session = login(&ctx, &admin).await;
    let promoted = unique_name("promoted");
    register(promoted.clone(), Some(session)).await;
    let created = User::find_by_username(&ctx.db, &promoted).await.unwrap().unwrap();
    assert!(created.has_role(Role::Admin));
}
