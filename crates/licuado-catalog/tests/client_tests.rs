// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use licuado_catalog::Client;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

const RECIPES_BODY: &str = r#"[
  {"id":"green-machine","name":"Green Machine","description":"Earthy and bright.",
   "ingredients":[{"name":"Spinach","amount":"2","unit":"cups"},
                  {"name":"Mango","amount":"1","unit":"cup"}],
   "proTips":["Blend the spinach with the liquid first."],
   "tags":["Healthy"]},
  {"id":"mystery-mix","name":"Mystery Mix","description":"Uses an off-catalog ingredient.",
   "ingredients":[{"name":"Dragon Fruit","amount":"1","unit":"piece"}],
   "proTips":[],
   "tags":["Limited Edition"]}
]"#;

const INGREDIENTS_BODY: &str = r#"[
  {"name":"Spinach","emoji":"🥬"},
  {"name":"Mango","emoji":"🥭"}
]"#;

const TAGS_BODY: &str = r#"[{"name":"Healthy","color":"green"}]"#;

fn json_header() -> Header {
    Header::from_bytes("Content-Type", "application/json").expect("valid content type header")
}

fn serve_catalog(server: Server, failing_resource: Option<&'static str>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for _ in 0..3 {
            let request = match server.recv() {
                Ok(request) => request,
                Err(_) => return,
            };
            let url = request.url().to_owned();
            if failing_resource.is_some_and(|resource| url.ends_with(resource)) {
                let response = Response::from_string("boom").with_status_code(500);
                let _ = request.respond(response);
                continue;
            }

            let body = if url.ends_with("/recipes.json") {
                RECIPES_BODY
            } else if url.ends_with("/ingredients.json") {
                INGREDIENTS_BODY
            } else if url.ends_with("/tags.json") {
                TAGS_BODY
            } else {
                let _ = request.respond(Response::from_string("not found").with_status_code(404));
                continue;
            };
            let response = Response::from_string(body)
                .with_status_code(200)
                .with_header(json_header());
            let _ = request.respond(response);
        }
    })
}

#[test]
fn fetch_catalog_converts_all_three_resources() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/assets", server.server_addr());
    let handle = serve_catalog(server, None);

    let client = Client::new(&addr, Duration::from_secs(2))?;
    let catalog = client.fetch_catalog()?;

    assert_eq!(catalog.recipes.len(), 2);
    assert_eq!(catalog.ingredients.len(), 2);
    assert_eq!(catalog.tags.len(), 1);

    // Known references resolved with catalog emojis and colors.
    let green = &catalog.recipes[0];
    assert_eq!(green.ingredients[0].ingredient.emoji, "🥬");
    assert_eq!(green.tags[0].color, "green");

    // Off-catalog references synthesized, never failed.
    let mystery = &catalog.recipes[1];
    assert!(!mystery.ingredients[0].ingredient.emoji.is_empty());
    assert_eq!(mystery.tags[0].name, "Limited Edition");
    assert_eq!(mystery.tags[0].color, "gray");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn one_failing_resource_fails_the_whole_load() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/assets", server.server_addr());
    let handle = serve_catalog(server, Some("/ingredients.json"));

    let client = Client::new(&addr, Duration::from_secs(2))?;
    let error = client
        .fetch_catalog()
        .expect_err("load should fail when any resource fails");
    let message = error.to_string();
    assert!(message.contains("ingredients.json"), "got: {message}");
    assert!(message.contains("500"), "got: {message}");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unreachable_server_error_names_the_base_url() -> Result<()> {
    let client = Client::new("http://127.0.0.1:1/assets", Duration::from_millis(50))?;

    let error = client
        .fetch_catalog()
        .expect_err("fetch should fail for unreachable endpoint");
    assert!(error.to_string().contains("http://127.0.0.1:1/assets"));
    Ok(())
}

#[test]
fn malformed_resource_body_is_a_decode_error() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/assets", server.server_addr());

    let handle = thread::spawn(move || {
        for _ in 0..3 {
            let request = match server.recv() {
                Ok(request) => request,
                Err(_) => return,
            };
            let response = Response::from_string("<!doctype html>")
                .with_status_code(200)
                .with_header(json_header());
            let _ = request.respond(response);
        }
    });

    let client = Client::new(&addr, Duration::from_secs(2))?;
    let error = client
        .fetch_catalog()
        .expect_err("non-JSON body should fail decoding");
    assert!(error.to_string().contains("decode recipes.json"));

    handle.join().expect("server thread should join");
    Ok(())
}
