//! Order-creation wizard
//!
//! Walks a receptionist through picking a client, one of that client's
//! vehicles and the service details, then submits the order header followed
//! by one detail call per part line. The wizard owns the draft; dropping it
//! discards every selection.
//!
//! Steps only move forward through the `select_*` and `confirm` calls and
//! only move back through the `change_*` and `back` calls.

use std::fmt;

use api::error::ApiError;
use api::models::{Client, Part, ServiceType, Vehicle};
use auth::models::User;
use chrono::{DateTime, Local, NaiveDate, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

pub mod backend;
pub mod draft;

pub use backend::OrderBackend;
pub use draft::{FailedLine, OrderDraft, OrderSummary, PartLine, SubmitOutcome};

/// Where the wizard is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    SelectingClient,
    SelectingVehicle,
    ConfiguringService,
    Confirming,
    /// The header exists and part lines are being sent
    Submitted,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::SelectingClient => "selecting a client",
            WizardStep::SelectingVehicle => "selecting a vehicle",
            WizardStep::ConfiguringService => "configuring the service",
            WizardStep::Confirming => "confirming",
            WizardStep::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

/// Errors raised by wizard actions
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Cannot {action} while {step}")]
    WrongStep {
        action: &'static str,
        step: WizardStep,
    },

    #[error("Unknown client {0}")]
    UnknownClient(i64),

    #[error("Vehicle {0} does not belong to the selected client")]
    UnknownVehicle(i64),

    #[error("Unknown service type {0}")]
    UnknownServiceType(i64),

    #[error("Unknown mechanic {0}")]
    UnknownMechanic(i64),

    #[error("Unknown part {0}")]
    UnknownPart(i64),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Only {available} units of {part_name} in stock, {requested} requested")]
    InsufficientStock {
        part_name: String,
        requested: u32,
        available: u32,
    },

    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Estimated date {date} must be after {today}")]
    DateNotInFuture { date: NaiveDate, today: NaiveDate },

    /// The order header could not be created; the draft is kept
    #[error("Failed to create the order: {0}")]
    Backend(#[from] ApiError),
}

/// Listings the wizard fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Clients,
    Vehicles,
    Parts,
    Mechanics,
    ServiceTypes,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Listing::Clients => "clients",
            Listing::Vehicles => "vehicles",
            Listing::Parts => "parts",
            Listing::Mechanics => "mechanics",
            Listing::ServiceTypes => "service types",
        };
        f.write_str(name)
    }
}

/// A listing that failed and was left empty
#[derive(Debug)]
pub struct ListingFailure {
    pub listing: Listing,
    pub error: ApiError,
}

/// Listings that could not be loaded
#[derive(Debug, Default)]
pub struct LoadReport {
    pub failures: Vec<ListingFailure>,
}

impl LoadReport {
    /// Whether every listing loaded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record<T>(&mut self, listing: Listing, result: Result<Vec<T>, ApiError>) -> Vec<T> {
        match result {
            Ok(rows) => rows,
            Err(error) => {
                warn!("Failed to load {}: {}", listing, error);
                self.failures.push(ListingFailure { listing, error });
                Vec::new()
            }
        }
    }
}

/// Order-creation wizard state
#[derive(Debug, Default)]
pub struct OrderWizard {
    step: WizardStep,
    draft: OrderDraft,
    clients: Vec<Client>,
    vehicles: Vec<Vehicle>,
    parts: Vec<Part>,
    mechanics: Vec<User>,
    service_types: Vec<ServiceType>,
}

impl OrderWizard {
    /// Empty wizard with no catalog loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch clients, parts, mechanics and service types concurrently.
    ///
    /// A failed listing is left empty and reported; it does not stop the others.
    pub async fn load<B: OrderBackend>(&mut self, backend: &B) -> LoadReport {
        let (clients, parts, mechanics, service_types) = tokio::join!(
            backend.list_clients(),
            backend.list_parts(),
            backend.list_mechanics(),
            backend.list_service_types(),
        );

        let mut report = LoadReport::default();
        self.clients = report.record(Listing::Clients, clients);
        self.parts = report.record(Listing::Parts, parts);
        self.mechanics = report.record(Listing::Mechanics, mechanics);
        self.service_types = report.record(Listing::ServiceTypes, service_types);

        info!(
            "Wizard loaded {} clients, {} parts, {} mechanics, {} service types",
            self.clients.len(),
            self.parts.len(),
            self.mechanics.len(),
            self.service_types.len()
        );
        report
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Vehicles of the selected client
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn mechanics(&self) -> &[User] {
        &self.mechanics
    }

    pub fn service_types(&self) -> &[ServiceType] {
        &self.service_types
    }

    fn require(&self, step: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                action,
                step: self.step,
            })
        }
    }

    /// Clients whose name or email contains `query` (any case) or whose
    /// document contains it verbatim
    pub fn filter_clients(&self, query: &str) -> Vec<&Client> {
        let needle = query.trim().to_lowercase();
        self.clients
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
                    || c.document.contains(query.trim())
            })
            .collect()
    }

    /// Pick the client and fetch their vehicles.
    ///
    /// A previously chosen vehicle survives only if it belongs to the new client.
    pub async fn select_client<B: OrderBackend>(
        &mut self,
        backend: &B,
        client_id: i64,
    ) -> Result<LoadReport, WizardError> {
        self.require(WizardStep::SelectingClient, "select a client")?;
        if !self.clients.iter().any(|c| c.id == client_id) {
            return Err(WizardError::UnknownClient(client_id));
        }

        let mut report = LoadReport::default();
        let result = backend.list_vehicles_by_client(client_id).await;
        self.vehicles = report
            .record(Listing::Vehicles, result)
            .into_iter()
            .filter(|v| v.client_id == client_id)
            .collect();

        let keep_vehicle = self
            .draft
            .vehicle_id
            .is_some_and(|id| self.vehicles.iter().any(|v| v.id == id));
        if !keep_vehicle {
            self.draft.vehicle_id = None;
        }

        self.draft.client_id = Some(client_id);
        self.step = WizardStep::SelectingVehicle;
        Ok(report)
    }

    /// Return to client selection
    pub fn change_client(&mut self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::SelectingVehicle | WizardStep::ConfiguringService => {
                self.step = WizardStep::SelectingClient;
                Ok(())
            }
            step => Err(WizardError::WrongStep {
                action: "change the client",
                step,
            }),
        }
    }

    pub fn select_vehicle(&mut self, vehicle_id: i64) -> Result<(), WizardError> {
        self.require(WizardStep::SelectingVehicle, "select a vehicle")?;
        if !self.vehicles.iter().any(|v| v.id == vehicle_id) {
            return Err(WizardError::UnknownVehicle(vehicle_id));
        }

        self.draft.vehicle_id = Some(vehicle_id);
        self.step = WizardStep::ConfiguringService;
        Ok(())
    }

    /// Return to vehicle selection
    pub fn change_vehicle(&mut self) -> Result<(), WizardError> {
        self.require(WizardStep::ConfiguringService, "change the vehicle")?;
        self.step = WizardStep::SelectingVehicle;
        Ok(())
    }

    pub fn set_service_type(&mut self, service_type_id: i64) -> Result<(), WizardError> {
        self.require(WizardStep::ConfiguringService, "set the service type")?;
        if !self.service_types.iter().any(|s| s.id == service_type_id) {
            return Err(WizardError::UnknownServiceType(service_type_id));
        }
        self.draft.service_type_id = Some(service_type_id);
        Ok(())
    }

    pub fn set_mechanic(&mut self, mechanic_id: i64) -> Result<(), WizardError> {
        self.require(WizardStep::ConfiguringService, "set the mechanic")?;
        if !self.mechanics.iter().any(|m| m.id == mechanic_id) {
            return Err(WizardError::UnknownMechanic(mechanic_id));
        }
        self.draft.mechanic_id = Some(mechanic_id);
        Ok(())
    }

    /// Record the estimated date; checked against today by [`OrderWizard::confirm`]
    pub fn set_estimated_date(&mut self, date: NaiveDate) -> Result<(), WizardError> {
        self.require(WizardStep::ConfiguringService, "set the estimated date")?;
        self.draft.estimated_date = Some(date);
        Ok(())
    }

    /// Parts in stock whose name or code contains `query`, any case
    pub fn available_parts(&self, query: &str) -> Vec<&Part> {
        let needle = query.trim().to_lowercase();
        self.parts
            .iter()
            .filter(|p| p.stock > 0)
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.code.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Add `quantity` units of a part, merging into an existing line.
    ///
    /// The merged quantity must still fit the stock; otherwise the line is
    /// left as it was.
    pub fn add_part(&mut self, part_id: i64, quantity: u32) -> Result<&PartLine, WizardError> {
        self.require(WizardStep::ConfiguringService, "add a part")?;
        if quantity == 0 {
            return Err(WizardError::InvalidQuantity);
        }

        let part = self
            .parts
            .iter()
            .find(|p| p.id == part_id)
            .ok_or(WizardError::UnknownPart(part_id))?;

        let lines = &mut self.draft.part_lines;
        let index = match lines.iter().position(|l| l.part_id == part_id) {
            Some(index) => {
                let requested = lines[index].quantity.saturating_add(quantity);
                check_stock(part, requested)?;
                lines[index].set_quantity(requested);
                index
            }
            None => {
                check_stock(part, quantity)?;
                lines.push(PartLine::new(part, quantity));
                lines.len() - 1
            }
        };
        Ok(&lines[index])
    }

    /// Drop a part line; returns whether one was removed
    pub fn remove_part(&mut self, part_id: i64) -> Result<bool, WizardError> {
        self.require(WizardStep::ConfiguringService, "remove a part")?;
        let before = self.draft.part_lines.len();
        self.draft.part_lines.retain(|l| l.part_id != part_id);
        Ok(self.draft.part_lines.len() != before)
    }

    /// Move to the confirmation step once the service is fully configured
    pub fn confirm(&mut self, today: NaiveDate) -> Result<(), WizardError> {
        self.require(WizardStep::ConfiguringService, "confirm")?;
        self.draft.validate_service(today)?;
        self.step = WizardStep::Confirming;
        Ok(())
    }

    /// Return to service configuration, keeping every selection
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.require(WizardStep::Confirming, "go back")?;
        self.step = WizardStep::ConfiguringService;
        Ok(())
    }

    /// Everything about to be submitted
    pub fn summary(&self) -> Result<OrderSummary, WizardError> {
        self.require(WizardStep::Confirming, "summarize")?;
        let draft = &self.draft;

        let client_id = draft.client_id.ok_or(WizardError::MissingField("client"))?;
        let vehicle_id = draft.vehicle_id.ok_or(WizardError::MissingField("vehicle"))?;
        let service_type_id = draft
            .service_type_id
            .ok_or(WizardError::MissingField("service type"))?;
        let mechanic_id = draft
            .mechanic_id
            .ok_or(WizardError::MissingField("mechanic"))?;

        Ok(OrderSummary {
            client: find(&self.clients, |c| c.id == client_id)
                .ok_or(WizardError::UnknownClient(client_id))?,
            vehicle: find(&self.vehicles, |v| v.id == vehicle_id)
                .ok_or(WizardError::UnknownVehicle(vehicle_id))?,
            service_type: find(&self.service_types, |s| s.id == service_type_id)
                .ok_or(WizardError::UnknownServiceType(service_type_id))?,
            mechanic: find(&self.mechanics, |m| m.id == mechanic_id)
                .ok_or(WizardError::UnknownMechanic(mechanic_id))?,
            estimated_date: draft
                .estimated_date
                .ok_or(WizardError::MissingField("estimated date"))?,
            part_lines: draft.part_lines.clone(),
            subtotal: draft.subtotal(),
        })
    }

    /// Create the order header, then one detail per part line.
    ///
    /// A header failure keeps the draft in the confirmation step so the
    /// submit can be retried. Detail failures do not undo the header and do
    /// not stop the remaining lines; they are returned in
    /// [`SubmitOutcome::failed_lines`]. Afterwards the wizard starts over.
    pub async fn submit<B: OrderBackend>(
        &mut self,
        backend: &B,
        now: DateTime<Local>,
    ) -> Result<SubmitOutcome, WizardError> {
        self.require(WizardStep::Confirming, "submit")?;
        let request = self
            .draft
            .order_request(now.with_timezone(&Utc), now.date_naive())?;

        let order = match backend.create_order(&request).await {
            Ok(order) => order,
            Err(e) => {
                error!("Failed to create order header: {}", e);
                return Err(WizardError::Backend(e));
            }
        };
        self.step = WizardStep::Submitted;

        let mut outcome = SubmitOutcome {
            order_id: order.id,
            created_lines: Vec::new(),
            failed_lines: Vec::new(),
        };
        for line in &self.draft.part_lines {
            match backend
                .create_order_detail(&line.detail_request(order.id))
                .await
            {
                Ok(()) => outcome.created_lines.push(line.clone()),
                Err(e) => {
                    warn!(
                        "Skipping part {} on order {}: {}",
                        line.part_id, order.id, e
                    );
                    outcome.failed_lines.push(FailedLine {
                        line: line.clone(),
                        error: e,
                    });
                }
            }
        }

        info!(
            "Order {} submitted with {} of {} part lines",
            order.id,
            outcome.created_lines.len(),
            self.draft.part_lines.len()
        );
        self.start_over();
        Ok(outcome)
    }

    /// Discard the draft and go back to client selection. Loaded catalogs are kept.
    pub fn start_over(&mut self) {
        self.draft = OrderDraft::default();
        self.vehicles.clear();
        self.step = WizardStep::SelectingClient;
    }
}

fn check_stock(part: &Part, requested: u32) -> Result<(), WizardError> {
    if requested > part.stock {
        return Err(WizardError::InsufficientStock {
            part_name: part.name.clone(),
            requested,
            available: part.stock,
        });
    }
    Ok(())
}

fn find<T: Clone>(items: &[T], pred: impl Fn(&T) -> bool) -> Option<T> {
    items.iter().find(|item| pred(item)).cloned()
}
