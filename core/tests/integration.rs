//! Full CRUD lifecycle test against a live server.
//!
//! Starts the server with an in-memory store on a random port, then exercises
//! every client operation over real HTTP using ureq.

use todo_core::{
    ApiError, CreateTodo, HttpMethod, HttpRequest, HttpResponse, TodoClient, UpdateTodo,
};
use todo_server::{AppState, MemoryStore};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let body = req.body.unwrap_or_default();
    let mut response = match req.method {
        HttpMethod::Get => agent.get(&req.path).call(),
        HttpMethod::Delete => agent.delete(&req.path).call(),
        HttpMethod::Post => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        HttpMethod::Patch => agent
            .patch(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, AppState::new(MemoryStore::new(), "integration")).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn crud_lifecycle() {
    let client = TodoClient::new(&start_server());

    // Health.
    let health = client.parse_health(execute(client.build_health())).unwrap();
    assert!(health.ok);
    assert_eq!(health.env, "integration");

    // List: empty.
    let page = client
        .parse_list_todos(execute(client.build_list_todos(1, 10)))
        .unwrap();
    assert!(page.list.is_empty(), "expected empty list");
    assert_eq!(page.total_page, 0);

    // Create.
    let input = CreateTodo {
        title: "Integration test".to_string(),
    };
    let req = client.build_create_todo(&input).unwrap();
    let created = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(created.title, "Integration test");
    assert!(!created.done);
    assert_eq!(created.created_at, created.updated_at);
    let id = created.id;

    // Round-trip through the list.
    let page = client
        .parse_list_todos(execute(client.build_list_todos(1, 10)))
        .unwrap();
    assert_eq!(page.list, vec![created.clone()]);

    // Update title only.
    let update = UpdateTodo {
        title: Some("Updated title".to_string()),
        done: None,
    };
    let req = client.build_update_todo(id, &update).unwrap();
    let updated = client.parse_update_todo(execute(req)).unwrap();
    assert_eq!(updated.title, "Updated title");
    assert!(!updated.done);

    // Update done only.
    let update = UpdateTodo {
        title: None,
        done: Some(true),
    };
    let req = client.build_update_todo(id, &update).unwrap();
    let done = client.parse_update_todo(execute(req)).unwrap();
    assert_eq!(done.title, "Updated title");
    assert!(done.done);
    assert_eq!(done.created_at, created.created_at);
    assert!(done.updated_at > updated.updated_at);

    // Invalid payload.
    let req = client
        .build_create_todo(&CreateTodo {
            title: String::new(),
        })
        .unwrap();
    let err = client.parse_create_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::BadRequest { ref message } if message == "invalid payload"));

    // Delete, then delete again: both succeed.
    client
        .parse_delete_todo(execute(client.build_delete_todo(id)))
        .unwrap();
    client
        .parse_delete_todo(execute(client.build_delete_todo(id)))
        .unwrap();

    // Update after delete: not found.
    let req = client.build_update_todo(id, &UpdateTodo::default()).unwrap();
    let err = client.parse_update_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // List: empty again.
    let page = client
        .parse_list_todos(execute(client.build_list_todos(1, 10)))
        .unwrap();
    assert!(page.list.is_empty(), "expected empty list after delete");
}

#[test]
fn pagination_over_http() {
    let client = TodoClient::new(&start_server());
    for i in 1..=25 {
        let req = client
            .build_create_todo(&CreateTodo {
                title: format!("todo {i}"),
            })
            .unwrap();
        client.parse_create_todo(execute(req)).unwrap();
    }

    let page = client
        .parse_list_todos(execute(client.build_list_todos(2, 10)))
        .unwrap();
    assert_eq!(page.list.len(), 10);
    assert_eq!(page.total, 25);
    assert_eq!(page.total_page, 3);
    assert_eq!(page.list[0].title, "todo 15");
    assert_eq!(page.list[9].title, "todo 6");

    let page = client
        .parse_list_todos(execute(client.build_list_todos(1, 101)))
        .unwrap();
    assert_eq!(page.page_size, 10);
}
