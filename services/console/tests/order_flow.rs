//! End-to-end order creation against an in-process fake backend

mod support;

use std::collections::HashMap;
use std::sync::Arc;

use auth::guard::GuardDecision;
use auth::models::Role;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use common::storage::MemoryStorage;
use serde_json::{Value, json};
use taller_console::Console;
use taller_console::order_cmd::CREATE_ORDER_PATH;
use taller_console::wizard::{OrderWizard, WizardStep};

use support::Recorded;

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn shop_backend(recorded: Recorded) -> Router {
    let orders = recorded.clone();
    let details = recorded;

    Router::new()
        .route(
            "/api/Cliente",
            get(|| async {
                Json(json!({"data": [
                    {"id": 1, "nombre": "Juan Pérez", "telefono": "3001234567",
                     "documento": "10203040", "correo": "juan@correo.co"},
                    {"id": 2, "nombre": "María Gómez", "telefono": "3109876543",
                     "documento": "50607080", "correo": "maria@correo.co"}
                ], "totalCount": 2}))
            }),
        )
        .route(
            "/api/Vehiculo",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let data = match params.get("clienteId").map(String::as_str) {
                    Some("1") => json!([{
                        "id": 10, "clienteId": 1, "clienteNombre": "Juan Pérez",
                        "marca": "Toyota", "modelo": "Corolla", "year": 2019,
                        "vin": "JTDBR32E720123456", "kilometraje": 45000
                    }]),
                    _ => json!([]),
                };
                Json(json!({"data": data}))
            }),
        )
        .route(
            "/api/Repuesto",
            get(|| async {
                Json(json!({"data": [
                    {"id": 3, "nombre": "Filtro de aceite", "codigo": "FA-01",
                     "descripcion": "", "stock": 20, "precioUnitario": 25000.5},
                    {"id": 4, "nombre": "Bujía", "codigo": "BJ-03",
                     "descripcion": "", "stock": 0, "precioUnitario": 12000}
                ]}))
            }),
        )
        .route(
            "/api/Usuario/mecanicos",
            get(|| async {
                Json(json!({"data": [{
                    "id": 7, "rolUsuarioId": 2, "rolUsuarioNombre": "Mecánico",
                    "nombre": "Luis", "correo": "luis@taller.co"
                }]}))
            }),
        )
        .route(
            "/api/TipoServicio",
            get(|| async { Json(json!({"data": [{"id": 2, "nombre": "Mantenimiento"}]})) }),
        )
        .route(
            "/api/OrdenServicio",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let orders = orders.clone();
                async move {
                    orders
                        .lock()
                        .unwrap()
                        .push(("POST /OrdenServicio".to_string(), bearer(&headers), body.clone()));
                    (
                        StatusCode::CREATED,
                        Json(json!({
                            "id": 501,
                            "vehiculoId": body["vehiculoId"],
                            "tipoServicioId": body["tipoServicioId"],
                            "usuarioId": body["usuarioId"],
                            "estado": "Pendiente"
                        })),
                    )
                }
            }),
        )
        .route(
            "/api/DetalleOrden",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let details = details.clone();
                async move {
                    details
                        .lock()
                        .unwrap()
                        .push(("POST /DetalleOrden".to_string(), bearer(&headers), body));
                    (StatusCode::CREATED, Json(json!({"id": 9001})))
                }
            }),
        )
}

async fn receptionist_console(recorded: Recorded) -> (String, Console) {
    let base_url = support::serve(shop_backend(recorded)).await;
    let (session, api) = support::client(base_url, Arc::new(MemoryStorage::new()));

    let token = support::mint("recepcion@taller.co");
    session
        .login(
            &token,
            support::profile(3, Role::Receptionist, "recepcion@taller.co"),
            Role::Receptionist,
        )
        .expect("Failed to open session");
    (token, Console::new(session, api))
}

#[tokio::test]
async fn test_receptionist_creates_order_with_one_part() {
    let recorded = Recorded::default();
    let (token, console) = receptionist_console(recorded.clone()).await;
    assert_eq!(console.enter(CREATE_ORDER_PATH).await, GuardDecision::Render);

    let today = Local::now().date_naive();
    let tomorrow = today.succ_opt().expect("tomorrow exists");

    let mut wizard = OrderWizard::new();
    let report = wizard.load(&console.api).await;
    assert!(report.is_clean(), "listings failed: {:?}", report.failures);
    assert_eq!(wizard.filter_clients("juan").len(), 1);

    let report = wizard.select_client(&console.api, 1).await.unwrap();
    assert!(report.is_clean());
    assert_eq!(wizard.vehicles().len(), 1);

    wizard.select_vehicle(10).unwrap();
    wizard.set_service_type(2).unwrap();
    wizard.set_mechanic(7).unwrap();
    wizard.set_estimated_date(tomorrow).unwrap();
    assert_eq!(wizard.available_parts("").len(), 1);
    wizard.add_part(3, 2).unwrap();
    wizard.confirm(today).unwrap();

    let summary = wizard.summary().unwrap();
    assert_eq!(summary.client.name, "Juan Pérez");
    assert_eq!(summary.vehicle.label(), "Toyota Corolla (2019)");

    let outcome = wizard.submit(&console.api, Local::now()).await.unwrap();
    assert_eq!(outcome.order_id, 501);
    assert!(outcome.is_complete());
    assert_eq!(wizard.step(), WizardStep::SelectingClient);

    let recorded = recorded.lock().unwrap();
    let endpoints: Vec<&str> = recorded.iter().map(|(e, _, _)| e.as_str()).collect();
    assert_eq!(endpoints, vec!["POST /OrdenServicio", "POST /DetalleOrden"]);

    let expected_bearer = Some(format!("Bearer {token}"));
    assert!(recorded.iter().all(|(_, auth, _)| *auth == expected_bearer));

    let header = &recorded[0].2;
    assert_eq!(header["vehiculoId"], 10);
    assert_eq!(header["tipoServicioId"], 2);
    assert_eq!(header["usuarioId"], 7);
    assert_eq!(header["fechaEstimada"], json!(format!("{tomorrow}T00:00:00Z")));
    assert!(header["fechaIngreso"].is_string());

    let detail = &recorded[1].2;
    assert_eq!(detail["ordenServicioId"], 501);
    assert_eq!(detail["repuestoId"], 3);
    assert_eq!(detail["cantidad"], 2);
    assert_eq!(detail["precioTotal"], json!(50001.0));
}

#[tokio::test]
async fn test_mechanic_is_sent_to_own_page() {
    let base_url = support::serve(Router::new()).await;
    let (session, api) = support::client(base_url, Arc::new(MemoryStorage::new()));
    session
        .login(
            &support::mint("mecanico@taller.co"),
            support::profile(7, Role::Mechanic, "mecanico@taller.co"),
            Role::Mechanic,
        )
        .unwrap();

    let console = Console::new(session, api);
    assert_eq!(
        console.enter(CREATE_ORDER_PATH).await,
        GuardDecision::RedirectToLanding("/mechanic/orders")
    );
}

#[tokio::test]
async fn test_logged_out_console_is_sent_to_login() {
    let base_url = support::serve(Router::new()).await;
    let (session, api) = support::client(base_url, Arc::new(MemoryStorage::new()));

    let console = Console::new(session, api);
    assert_eq!(
        console.enter(CREATE_ORDER_PATH).await,
        GuardDecision::RedirectToLogin {
            to: "/login".to_string(),
            from: CREATE_ORDER_PATH.to_string(),
        }
    );
    assert!(console.require_session().await.is_err());
}
