//! Catalog subcommands: list, vehicles.

use std::io::{self, Write};

use anyhow::Result;
use api::ApiError;

use crate::context::Console;

/// Listings available from the command line
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Catalog {
    Clients,
    Parts,
    Mechanics,
    ServiceTypes,
}

fn matches(query: Option<&str>, fields: &[&str]) -> bool {
    let Some(query) = query.map(str::to_lowercase).filter(|q| !q.is_empty()) else {
        return true;
    };
    fields.iter().any(|f| f.to_lowercase().contains(&query))
}

fn backend_error(e: ApiError) -> anyhow::Error {
    anyhow::anyhow!(e.notice())
}

/// Print one catalog, optionally filtered by `search`
pub async fn list(console: &Console, catalog: Catalog, search: Option<&str>) -> Result<()> {
    console.require_session().await?;
    let api = &console.api;

    let rows: Vec<String> = match catalog {
        Catalog::Clients => api
            .list_clients()
            .await
            .map_err(backend_error)?
            .into_iter()
            .filter(|c| matches(search, &[c.name.as_str(), c.email.as_str(), c.document.as_str()]))
            .map(|c| format!("{:>5}  {}  <{}>  doc {}", c.id, c.name, c.email, c.document))
            .collect(),
        Catalog::Parts => api
            .list_parts()
            .await
            .map_err(backend_error)?
            .into_iter()
            .filter(|p| matches(search, &[p.name.as_str(), p.code.as_str()]))
            .map(|p| {
                format!(
                    "{:>5}  {}  [{}]  stock {}  @ {}",
                    p.id, p.name, p.code, p.stock, p.unit_price
                )
            })
            .collect(),
        Catalog::Mechanics => api
            .list_mechanics()
            .await
            .map_err(backend_error)?
            .into_iter()
            .filter(|m| matches(search, &[m.name.as_str(), m.email.as_str()]))
            .map(|m| format!("{:>5}  {}  <{}>", m.id, m.name, m.email))
            .collect(),
        Catalog::ServiceTypes => api
            .list_service_types()
            .await
            .map_err(backend_error)?
            .into_iter()
            .filter(|s| matches(search, &[s.name.as_str()]))
            .map(|s| format!("{:>5}  {}", s.id, s.name))
            .collect(),
    };

    let mut out = io::stdout();
    if rows.is_empty() {
        writeln!(out, "Nothing found")?;
    }
    for row in rows {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

/// Print the vehicles of one client
pub async fn vehicles(console: &Console, client_id: i64) -> Result<()> {
    console.require_session().await?;
    let vehicles = console
        .api
        .list_vehicles_by_client(client_id)
        .await
        .map_err(backend_error)?;

    let mut out = io::stdout();
    if vehicles.is_empty() {
        writeln!(out, "Client {} has no vehicles", client_id)?;
    }
    for v in vehicles {
        writeln!(out, "{:>5}  {}  VIN {}  {} km", v.id, v.label(), v.vin, v.mileage)?;
    }
    Ok(())
}
