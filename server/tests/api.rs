use axum::{
    http::{self, header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use todo_core::FlashKind;
use todos_server::{
    app,
    views::{FormKind, ListFormView, ListView, ListsView},
    AppState, SESSION_COOKIE,
};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

/// A browser stand-in: remembers the session cookie between requests.
struct Client {
    app: Router,
    cookie: Option<String>,
}

impl Client {
    fn new(state: &AppState) -> Self {
        Self {
            app: app(state.clone()),
            cookie: None,
        }
    }

    async fn send(&mut self, method: &str, uri: &str, form: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if form.is_some() {
            builder = builder.header(
                http::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            );
        }
        let request = builder.body(form.unwrap_or_default().to_string()).unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send("GET", uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Response {
        self.send("POST", uri, Some(form)).await
    }

    async fn lists(&mut self) -> ListsView {
        let resp = self.get("/lists").await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }

    async fn list(&mut self, id: u64) -> ListView {
        let resp = self.get(&format!("/lists/{id}")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }

    async fn create_list(&mut self, title: &str) {
        let resp = self.post("/lists", &format!("todoListTitle={title}")).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    async fn create_todo(&mut self, list_id: u64, title: &str) {
        let resp = self
            .post(&format!("/lists/{list_id}/todos"), &format!("todoTitle={title}"))
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }
}

fn client() -> Client {
    Client::new(&AppState::default())
}

fn titles(view: &ListsView) -> Vec<&str> {
    view.lists.iter().map(|list| list.title.as_str()).collect()
}

// --- session ---

#[tokio::test]
async fn root_redirects_to_lists() {
    let mut client = client();
    let resp = client.get("/").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/lists");
}

#[tokio::test]
async fn first_write_opens_one_session() {
    let state = AppState::default();
    let mut client = Client::new(&state);

    let resp = client.get("/lists").await;
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(state.sessions.len().await, 0);

    let resp = client.post("/lists", "todoListTitle=Home").await;
    let set_cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(set_cookie.contains("HttpOnly"));

    let resp = client.get("/lists").await;
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(state.sessions.len().await, 1);
}

#[tokio::test]
async fn cookieless_reads_store_nothing() {
    let state = AppState::default();
    for uri in ["/no-such-route", "/lists", "/lists/new", "/lists/7"] {
        for _ in 0..50 {
            let resp = Client::new(&state).get(uri).await;
            assert!(resp.headers().get(header::SET_COOKIE).is_none());
        }
    }
    assert_eq!(state.sessions.len().await, 0);
}

#[tokio::test]
async fn session_count_is_capped() {
    let config = todos_server::Config {
        max_sessions: 3,
        ..Default::default()
    };
    let state = AppState::new(&config);
    for i in 0..10 {
        let mut client = Client::new(&state);
        client.create_list(&format!("List{i}")).await;
    }
    assert_eq!(state.sessions.len().await, 3);
}

#[tokio::test]
async fn unknown_cookie_gets_a_fresh_session() {
    let mut client = client();
    client.cookie = Some(format!("{SESSION_COOKIE}=00000000-0000-0000-0000-000000000000"));
    let resp = client.post("/lists", "todoListTitle=Home").await;
    assert!(resp.headers().get(header::SET_COOKIE).is_some());
    assert_ne!(
        client.cookie.as_deref(),
        Some("todos.sid=00000000-0000-0000-0000-000000000000")
    );
}

#[tokio::test]
async fn sessions_are_isolated() {
    let state = AppState::default();
    let mut alice = Client::new(&state);
    let mut bob = Client::new(&state);

    alice.create_list("Private").await;
    assert_eq!(titles(&alice.lists().await), ["Private"]);
    assert!(bob.lists().await.lists.is_empty());
}

#[tokio::test]
async fn seeded_sessions_start_with_demo_lists() {
    let config = todos_server::Config {
        seed: true,
        ..Default::default()
    };
    let mut client = Client::new(&AppState::new(&config));
    let view = client.lists().await;
    assert_eq!(view.lists.len(), 4);
    assert!(view.lists.last().unwrap().done);
}

// --- lists ---

#[tokio::test]
async fn list_of_lists_starts_empty() {
    let mut client = client();
    let view = client.lists().await;
    assert!(view.lists.is_empty());
    assert!(view.flash.is_empty());
}

#[tokio::test]
async fn new_list_form_is_blank() {
    let mut client = client();
    let resp = client.get("/lists/new").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let form: ListFormView = body_json(resp).await;
    assert_eq!(form.form, FormKind::NewList);
    assert!(form.todo_list_title.is_empty());
    assert!(form.errors.is_empty());
}

#[tokio::test]
async fn create_list_redirects_and_flashes_once() {
    let mut client = client();
    let resp = client.post("/lists", "todoListTitle=++Groceries++").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/lists");

    let view = client.lists().await;
    assert_eq!(titles(&view), ["Groceries"]);
    assert_eq!(view.flash.len(), 1);
    assert_eq!(view.flash[0].kind, FlashKind::Success);
    assert_eq!(view.flash[0].message, "The todo list has been created.");

    assert!(client.lists().await.flash.is_empty());
}

#[tokio::test]
async fn blank_list_title_rerenders_form() {
    let mut client = client();
    let resp = client.post("/lists", "todoListTitle=+++").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let form: ListFormView = body_json(resp).await;
    assert_eq!(form.errors, ["The list title is required."]);
    assert_eq!(form.todo_list_title, "   ");
    assert!(client.lists().await.lists.is_empty());
}

#[tokio::test]
async fn missing_list_title_field_is_required() {
    let mut client = client();
    let resp = client.post("/lists", "").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let form: ListFormView = body_json(resp).await;
    assert_eq!(form.errors, ["The list title is required."]);
}

#[tokio::test]
async fn overlong_list_title_is_rejected() {
    let mut client = client();
    let resp = client
        .post("/lists", &format!("todoListTitle={}", "a".repeat(101)))
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let form: ListFormView = body_json(resp).await;
    assert_eq!(form.errors, ["List title must be between 1 and 100 characters."]);
}

#[tokio::test]
async fn duplicate_list_title_is_rejected() {
    let mut client = client();
    client.create_list("Groceries").await;

    let resp = client.post("/lists", "todoListTitle=Groceries").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let form: ListFormView = body_json(resp).await;
    assert_eq!(form.errors, ["List title must be unique."]);

    client.create_list("groceries").await;
    assert_eq!(client.lists().await.lists.len(), 2);
}

#[tokio::test]
async fn lists_sort_not_done_first_then_by_title() {
    let mut client = client();
    client.create_list("Groceries").await;
    client.create_list("Work").await;
    client.create_list("banana").await;

    client.create_todo(1, "Milk").await;
    client.create_todo(1, "Eggs").await;
    client.post("/lists/1/todos/2/toggle", "").await;
    client.create_todo(2, "Report").await;
    client.post("/lists/2/todos/1/toggle", "").await;

    let view = client.lists().await;
    assert_eq!(titles(&view), ["banana", "Groceries", "Work"]);
    let ids: Vec<u64> = view.lists.iter().map(|list| list.id).collect();
    assert_eq!(ids, [3, 1, 2]);
    assert!(view.lists[2].done);
    assert_eq!(view.lists[1].size, 2);
    assert_eq!(view.lists[1].done_count, 1);
}

#[tokio::test]
async fn unknown_or_malformed_list_id_is_not_found() {
    let mut client = client();
    for uri in ["/lists/7", "/lists/seven", "/lists/7/edit"] {
        let resp = client.get(uri).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: serde_json::Value = body_json(resp).await;
        assert_eq!(body["error"], "Not Found");
    }
    for uri in ["/lists/7/destroy", "/lists/7/complete_all", "/lists/x/edit"] {
        let resp = client.post(uri, "todoListTitle=Home").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

// --- edit / destroy / complete ---

#[tokio::test]
async fn edit_list_renames_and_redirects() {
    let mut client = client();
    client.create_list("Groceries").await;
    client.create_list("Work").await;

    let resp = client.get("/lists/1/edit").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let form: ListFormView = body_json(resp).await;
    assert_eq!(form.form, FormKind::EditList);
    assert_eq!(form.list_id, Some(1));
    assert_eq!(form.todo_list_title, "Groceries");

    let resp = client.post("/lists/1/edit", "todoListTitle=Shopping").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/lists/1");

    let view = client.list(1).await;
    assert_eq!(view.list.title, "Shopping");
    assert_eq!(view.flash[0].message, "Todo list updated.");
}

#[tokio::test]
async fn edit_list_keeps_own_title_but_rejects_others() {
    let mut client = client();
    client.create_list("Groceries").await;
    client.create_list("Work").await;

    let resp = client.post("/lists/1/edit", "todoListTitle=Groceries").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client.post("/lists/1/edit", "todoListTitle=Work").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let form: ListFormView = body_json(resp).await;
    assert_eq!(form.errors, ["List title must be unique."]);
    assert_eq!(form.todo_list_title, "Work");
    assert_eq!(client.list(1).await.list.title, "Groceries");
}

#[tokio::test]
async fn destroy_list_removes_it() {
    let mut client = client();
    client.create_list("Groceries").await;

    let resp = client.post("/lists/1/destroy", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/lists");

    let view = client.lists().await;
    assert!(view.lists.is_empty());
    assert_eq!(view.flash.last().unwrap().message, "Todo list deleted.");

    assert_eq!(client.get("/lists/1").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        client.post("/lists/1/destroy", "").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn complete_all_marks_every_todo() {
    let mut client = client();
    client.create_list("Chores").await;
    client.create_todo(1, "Sweep").await;
    client.create_todo(1, "Mop").await;

    let resp = client.post("/lists/1/complete_all", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/lists/1");

    let view = client.list(1).await;
    assert!(view.list.done);
    assert!(view.todos.iter().all(|todo| todo.done));
    assert_eq!(
        view.flash.last().unwrap().message,
        "All todos have been marked as done."
    );
}

// --- todos ---

#[tokio::test]
async fn todos_are_listed_sorted() {
    let mut client = client();
    client.create_list("Errands").await;
    client.create_todo(1, "post+office").await;
    client.create_todo(1, "Bank").await;
    client.create_todo(1, "apples").await;
    client.post("/lists/1/todos/3/toggle", "").await;

    let view = client.list(1).await;
    let titles: Vec<&str> = view.todos.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Bank", "post office", "apples"]);
}

#[tokio::test]
async fn blank_todo_title_is_rejected() {
    let mut client = client();
    client.create_list("Errands").await;

    let resp = client.post("/lists/1/todos", "todoTitle=++").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let view: ListView = body_json(resp).await;
    assert_eq!(view.errors, ["The todo title is required."]);
    assert_eq!(view.todo_title.as_deref(), Some("  "));
    assert!(view.todos.is_empty());

    assert!(client.list(1).await.todos.is_empty());
}

#[tokio::test]
async fn todo_on_unknown_list_is_not_found() {
    let mut client = client();
    let resp = client.post("/lists/4/todos", "todoTitle=Milk").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggle_flips_and_reports() {
    let mut client = client();
    client.create_list("Groceries").await;
    client.create_todo(1, "Milk").await;

    let resp = client.post("/lists/1/todos/1/toggle", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/lists/1");
    let view = client.list(1).await;
    assert!(view.todos[0].done);
    let flash = view.flash.last().unwrap();
    assert_eq!(flash.message, "\"Milk\" marked done.");
    assert_eq!(flash.kind, FlashKind::Success);

    client.post("/lists/1/todos/1/toggle", "").await;
    let view = client.list(1).await;
    assert!(!view.todos[0].done);
    let flash = view.flash.last().unwrap();
    assert_eq!(flash.message, "\"Milk\" marked as NOT done!");
    assert_eq!(flash.kind, FlashKind::Info);
}

#[tokio::test]
async fn destroy_todo_removes_it() {
    let mut client = client();
    client.create_list("Groceries").await;
    client.create_todo(1, "Milk").await;
    client.create_todo(1, "Eggs").await;

    let resp = client.post("/lists/1/todos/1/destroy", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/lists/1");

    let view = client.list(1).await;
    assert_eq!(view.todos.len(), 1);
    assert_eq!(view.todos[0].title, "Eggs");
    assert_eq!(view.flash.last().unwrap().message, "The todo has been deleted.");

    for uri in ["/lists/1/todos/1/toggle", "/lists/1/todos/1/destroy", "/lists/1/todos/x/toggle"] {
        assert_eq!(client.post(uri, "").await.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}
