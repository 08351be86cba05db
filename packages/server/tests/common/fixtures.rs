//! Test fixtures for creating test data.

use chrono::Utc;
use donation_core::common::Identity;
use donation_core::domains::points::activities::{approve_point, create_point};
use donation_core::domains::points::data::PointInput;
use donation_core::domains::points::models::{DonationPoint, PointRecord};
use donation_core::kernel::ServerDeps;
use serde_json::{json, Value};
use uuid::Uuid;

/// Valid create/edit payload in central Bogotá
pub fn point_input(name: &str, categories: &[&str]) -> PointInput {
    PointInput {
        nombre: name.to_string(),
        direccion: "Carrera 7 # 12-34".to_string(),
        latitud: Some(4.6097),
        longitud: Some(-74.0817),
        tipos_donacion: categories.iter().map(|c| c.to_string()).collect(),
        horario_apertura: Some("08:00".to_string()),
        horario_cierre: Some("17:30".to_string()),
        telefono: Some("3001234567".to_string()),
        ..Default::default()
    }
}

/// Same payload at a given position
pub fn point_input_at(name: &str, latitude: f64, longitude: f64) -> PointInput {
    PointInput {
        latitud: Some(latitude),
        longitud: Some(longitude),
        ..point_input(name, &["ropa"])
    }
}

/// JSON body of a create/edit request
pub fn point_body(name: &str, categories: &[&str]) -> Value {
    json!({
        "nombre": name,
        "direccion": "Carrera 7 # 12-34",
        "latitud": 4.6097,
        "longitud": -74.0817,
        "tiposDonacion": categories,
        "horarioApertura": "08:00",
        "horarioCierre": "17:30",
    })
}

/// Create a point as `creator` and leave it in its initial state
pub async fn create_test_point(
    deps: &ServerDeps,
    creator: &Identity,
    name: &str,
    categories: &[&str],
) -> DonationPoint {
    create_point(point_input(name, categories), creator, deps)
        .await
        .expect("Failed to create test point")
}

/// Create an organization point and approve it
pub async fn create_approved_org_point(
    deps: &ServerDeps,
    org: &Identity,
    admin: &Identity,
    name: &str,
    categories: &[&str],
) -> DonationPoint {
    let point = create_test_point(deps, org, name, categories).await;
    approve_point(point.id, admin, deps)
        .await
        .expect("Failed to approve test point")
}

/// Raw row as an older writer would have stored it: no creator, plain-text
/// category, arbitrary `activo` payload.
pub fn legacy_record(name: &str, tipo_donacion: &str, activo: Option<Value>) -> PointRecord {
    let now = Utc::now();
    PointRecord {
        id: Uuid::now_v7(),
        nombre: name.to_string(),
        direccion: "Calle 100 # 15-20".to_string(),
        latitud: 4.6867,
        longitud: -74.0547,
        tipo_donacion: tipo_donacion.to_string(),
        horario_apertura: None,
        horario_cierre: None,
        telefono: None,
        email: None,
        activo,
        estado: "ACTIVO".to_string(),
        motivo_rechazo: None,
        reenviado: false,
        usuario_creador_id: None,
        tipo_creador: None,
        fecha_creacion: now,
        fecha_actualizacion: now,
    }
}

/// Sorted point names, for order-insensitive assertions
pub fn names(points: &[DonationPoint]) -> Vec<&str> {
    let mut names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
    names.sort();
    names
}
