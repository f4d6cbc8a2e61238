use shared::{
    domain::{VehicleId, VehicleKind, VehicleSpec},
    protocol::{ListFilter, VehicleSubmission},
};
use tokio::net::TcpListener;

use super::mock_server::{bike, car, spawn_inventory_server};
use crate::{api::VehicleApi, error::ClientError, HttpVehicleApi};

#[tokio::test]
async fn list_without_filter_sends_no_query_string() {
    let server = spawn_inventory_server(vec![car("1", "Toyota", "Corolla", 4, "Petrol")]).await;
    let api = HttpVehicleApi::new(&server.url).expect("api");

    let vehicles = api.list(&ListFilter::default()).await.expect("list");

    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].kind(), VehicleKind::Car);
    let requests = server.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/vehicles");
    assert_eq!(requests[0].query, None);
}

#[tokio::test]
async fn list_filter_is_sent_as_encoded_query() {
    let server = spawn_inventory_server(vec![
        car("1", "Honda", "Civic", 4, "Petrol"),
        bike("2", "Honda", "Shadow"),
        bike("3", "Land Rover", "Odd"),
    ])
    .await;
    let api = HttpVehicleApi::new(&server.url).expect("api");

    let hondas = api
        .list(&ListFilter::new(Some("Honda"), Some("bike")))
        .await
        .expect("list");
    assert_eq!(hondas.len(), 1);
    assert_eq!(hondas[0].id, VehicleId::new("2"));

    let spaced = api
        .list(&ListFilter::new(Some("Land Rover"), None))
        .await
        .expect("list");
    assert_eq!(spaced.len(), 1);

    let queries: Vec<Option<String>> = server
        .requests()
        .await
        .into_iter()
        .map(|request| request.query)
        .collect();
    assert_eq!(
        queries,
        vec![
            Some("brand=Honda&type=bike".to_string()),
            Some("brand=Land%20Rover".to_string())
        ]
    );
}

#[tokio::test]
async fn capitalized_type_tags_decode() {
    let server = spawn_inventory_server(vec![bike("7", "Yamaha", "Bolt")]).await;
    let api = HttpVehicleApi::new(&server.url).expect("api");

    let vehicle = api.get(&VehicleId::new("7")).await.expect("get");

    assert_eq!(vehicle.kind(), VehicleKind::Bike);
    assert_eq!(vehicle.details.as_deref(), Some("garage kept"));
    assert_eq!(
        vehicle.spec,
        VehicleSpec::Bike {
            sidecar: true,
            category: "Touring".to_string()
        }
    );
}

#[tokio::test]
async fn missing_vehicle_body_is_a_decode_error() {
    let server = spawn_inventory_server(Vec::new()).await;
    let api = HttpVehicleApi::new(&server.url).expect("api");

    let err = api.get(&VehicleId::new("404")).await.expect_err("empty body");

    match err {
        ClientError::Decode { url, .. } => assert!(url.ends_with("/api/vehicles/404")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn add_posts_form_fields_with_lowercase_type() {
    let server = spawn_inventory_server(Vec::new()).await;
    let api = HttpVehicleApi::new(&format!("{}/", server.url)).expect("api");

    let ack = api
        .add(&VehicleSubmission {
            id: None,
            brand: "Volvo".to_string(),
            model: "FH16".to_string(),
            year: 2018,
            spec: VehicleSpec::Truck {
                payload: 18000,
                trailer: true,
            },
        })
        .await
        .expect("add");

    assert!(ack.ok);
    let mutations = server.mutations().await;
    assert_eq!(mutations.len(), 1);
    let request = &mutations[0];
    assert_eq!(request.path, "/api/vehicles/add");
    assert_eq!(request.field("type"), Some("truck"));
    assert_eq!(request.field("payload"), Some("18000"));
    assert_eq!(request.field("trailer"), Some("true"));
    assert_eq!(request.field("id"), None);

    let stored = api.list(&ListFilter::default()).await.expect("list");
    assert_eq!(stored[0].brand, "Volvo");
}

#[tokio::test]
async fn rejected_mutation_is_returned_not_raised() {
    let server = spawn_inventory_server(Vec::new()).await;
    let api = HttpVehicleApi::new(&server.url).expect("api");

    let ack = api.delete(&VehicleId::new("missing")).await.expect("delete");

    assert!(!ack.ok);
    assert_eq!(server.mutations().await[0].field("id"), Some("missing"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let api = HttpVehicleApi::new(&format!("http://{addr}")).expect("api");

    let err = api.list(&ListFilter::default()).await.expect_err("refused");

    assert!(matches!(err, ClientError::Transport { .. }));
}

#[test]
fn malformed_server_url_is_rejected() {
    let err = HttpVehicleApi::new("http://[not-an-address").expect_err("bad url");
    assert!(matches!(err, ClientError::InvalidServerUrl { .. }));
}
