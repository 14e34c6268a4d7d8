//! HTTP transport tests against a mock JSON:API server.

#![cfg(feature = "remote")]

use jsonapi_client::{
    ClientError, Consumer, ConsumerConfig, FetchError, MethodTable, ResourceDefinition,
};
use mockito::Matcher;
use serde_json::json;

const MEDIA_TYPE: &str = "application/vnd.api+json";

fn consumer(server: &mockito::Server) -> Consumer {
    Consumer::new(ConsumerConfig::new(server.url())).unwrap()
}

mod requests {
    use super::*;

    #[test]
    fn get_sends_jsonapi_headers() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/posts")
            .match_header("content-type", MEDIA_TYPE)
            .match_header("accept", MEDIA_TYPE)
            .with_header("content-type", MEDIA_TYPE)
            .with_body(r#"{"posts": []}"#)
            .create();

        let response = consumer(&server).get("/posts", &[]).unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({ "posts": [] }));
        mock.assert();
    }

    #[test]
    fn get_merges_params_into_existing_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/posts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("include".into(), "author".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_header("content-type", MEDIA_TYPE)
            .with_body(r#"{"posts": []}"#)
            .create();

        consumer(&server)
            .get("/posts?include=author", &[("page", "2")])
            .unwrap();
        mock.assert();
    }

    #[test]
    fn post_sends_json_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/posts")
            .match_header("content-type", MEDIA_TYPE)
            .match_body(Matcher::Json(json!({ "posts": [{ "title": "Hello" }] })))
            .with_status(201)
            .with_header("content-type", MEDIA_TYPE)
            .with_body(r#"{"posts": [{"id": "1", "title": "Hello"}]}"#)
            .create();

        let response = consumer(&server)
            .post("/posts", &json!({ "posts": [{ "title": "Hello" }] }))
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.body["posts"][0]["id"], "1");
        mock.assert();
    }

    #[test]
    fn put_sends_json_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PUT", "/posts/1")
            .match_body(Matcher::Json(json!({ "posts": [{ "id": "1", "title": "Bye" }] })))
            .with_status(204)
            .create();

        let response = consumer(&server)
            .put("posts/1", &json!({ "posts": [{ "id": "1", "title": "Bye" }] }))
            .unwrap();

        assert_eq!(response.status, 204);
        mock.assert();
    }

    #[test]
    fn absolute_url_bypasses_base_url() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/elsewhere")
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create();

        let other = Consumer::new(ConsumerConfig::new("http://127.0.0.1:1")).unwrap();
        let response = other
            .get(&format!("{}/elsewhere", server.url()), &[])
            .unwrap();

        assert_eq!(response.body, json!([]));
        mock.assert();
    }
}

mod responses {
    use super::*;

    #[test]
    fn non_json_body_is_returned_as_string() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/health")
            .with_header("content-type", "text/plain")
            .with_body("ok")
            .create();

        let response = consumer(&server).get("/health", &[]).unwrap();
        assert_eq!(response.body, json!("ok"));
    }

    #[test]
    fn empty_json_body_is_null() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/posts")
            .with_header("content-type", MEDIA_TYPE)
            .create();

        let response = consumer(&server).get("/posts", &[]).unwrap();
        assert!(response.body.is_null());
    }

    #[test]
    fn malformed_json_body() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/posts")
            .with_header("content-type", MEDIA_TYPE)
            .with_body("{\"posts\": [")
            .create();

        let result = consumer(&server).get("/posts", &[]);
        assert!(matches!(result, Err(ClientError::Parsing { .. })));
    }

    #[test]
    fn not_found() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/posts/9").with_status(404).create();

        let result = consumer(&server).get("/posts/9", &[]);
        match result {
            Err(ClientError::ResourceNotFound { url }) => assert!(url.ends_with("/posts/9")),
            other => panic!("expected ResourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn server_error_status() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/posts").with_status(500).create();

        let err = consumer(&server).get("/posts", &[]).unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }));
        assert_eq!(err.to_string(), "the server responded with status 500");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn connection_refused() {
        let consumer = Consumer::new(ConsumerConfig::new("http://127.0.0.1:1")).unwrap();

        let result = consumer.get("/posts", &[]);
        assert!(matches!(result, Err(ClientError::ConnectionFailed { .. })));
    }

    #[test]
    fn tls_handshake_failure() {
        // plain HTTP server behind an https:// base URL
        let server = mockito::Server::new();
        let base_url = format!("https://{}", server.host_with_port());
        let consumer = Consumer::new(ConsumerConfig::new(base_url)).unwrap();

        let result = consumer.get("/posts", &[]);
        assert!(matches!(result, Err(ClientError::ConnectionFailed { .. })));
    }
}

mod definitions {
    use super::*;

    const POSTS: &str = r#"{
        "links": { "posts.author": { "type": "users" } },
        "posts": [{ "id": "1", "title": "Hello", "links": { "author": "9" } }],
        "linked": { "users": [{ "id": "9", "name": "Walter" }] }
    }"#;

    #[test]
    fn fetch_resolves_response() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/posts")
            .with_header("content-type", MEDIA_TYPE)
            .with_body(POSTS)
            .create();

        let posts = ResourceDefinition::new("posts").resource_methods(
            MethodTable::new().method("headline", |post| {
                json!(post
                    .attribute("title")
                    .and_then(|t| t.as_str())
                    .map(str::to_uppercase))
            }),
        );
        posts.set_api_client(consumer(&server)).unwrap();

        let resources = posts.fetch("/posts", &[]).unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(
            resources[0].one("author").unwrap().attribute("name"),
            Some(&json!("Walter"))
        );
        assert_eq!(resources[0].call("headline"), Some(json!("HELLO")));
        mock.assert();
    }

    #[test]
    fn fetch_reports_missing_collection() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/posts")
            .with_header("content-type", MEDIA_TYPE)
            .with_body(r#"{"articles": []}"#)
            .create();

        let posts = ResourceDefinition::new("posts");
        posts.set_api_client(consumer(&server)).unwrap();

        let err = posts.fetch("/posts", &[]).unwrap_err();
        assert!(matches!(err, FetchError::Resolve(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn fetch_reports_transport_errors() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/posts").with_status(404).create();

        let posts = ResourceDefinition::new("posts");
        posts.set_api_client(consumer(&server)).unwrap();

        let err = posts.fetch("/posts", &[]).unwrap_err();
        assert!(matches!(
            err,
            FetchError::Client(ClientError::ResourceNotFound { .. })
        ));
    }
}
