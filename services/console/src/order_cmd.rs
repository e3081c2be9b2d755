//! Interactive order creation.

use std::io::{self, Write};

use anyhow::Result;
use auth::guard::GuardDecision;
use chrono::Local;
use tracing::info;

use crate::context::Console;
use crate::prompt;
use crate::wizard::{LoadReport, OrderSummary, OrderWizard, WizardError, WizardStep};

/// Page the order wizard lives on
pub const CREATE_ORDER_PATH: &str = "/reception/create-order";

/// What the user picked on the service menu
enum ServiceAction {
    ServiceType,
    Mechanic,
    EstimatedDate,
    AddPart,
    RemovePart,
    ChangeVehicle,
    ChangeClient,
    Review,
    Cancel,
}

/// Run the order wizard until the order is submitted or the user cancels
pub async fn create_order(console: &Console) -> Result<()> {
    match console.enter(CREATE_ORDER_PATH).await {
        GuardDecision::Render => {}
        GuardDecision::RedirectToLanding(landing) => {
            anyhow::bail!("Only receptionists create orders; your page is {landing}")
        }
        GuardDecision::RedirectToLogin { .. } | GuardDecision::Loading => {
            anyhow::bail!("Not logged in. Run `taller login` first.")
        }
    }

    let mut out = io::stdout();
    let mut wizard = OrderWizard::new();
    let report = wizard.load(&console.api).await;
    print_failures(&mut out, &report)?;
    ensure_session(console)?;

    loop {
        match wizard.step() {
            WizardStep::SelectingClient => {
                if !pick_client(console, &mut wizard, &mut out).await? {
                    return cancelled(&mut out);
                }
            }
            WizardStep::SelectingVehicle => {
                if !pick_vehicle(&mut wizard, &mut out)? {
                    return cancelled(&mut out);
                }
            }
            WizardStep::ConfiguringService => {
                if !configure_service(&mut wizard, &mut out)? {
                    return cancelled(&mut out);
                }
            }
            WizardStep::Confirming => {
                let summary = wizard.summary()?;
                print_summary(&mut out, &summary)?;

                let choices = ["Submit", "Back", "Cancel"].map(String::from);
                match prompt::choose("Create this order?", &choices)? {
                    Some(0) => {
                        match wizard.submit(&console.api, Local::now()).await {
                            Ok(outcome) => {
                                writeln!(out, "Order {} created", outcome.order_id)?;
                                for failed in &outcome.failed_lines {
                                    writeln!(
                                        out,
                                        "  Part {} was not attached: {}",
                                        failed.line.part_name,
                                        failed.error.notice()
                                    )?;
                                }
                                info!("Order wizard finished with order {}", outcome.order_id);
                                return Ok(());
                            }
                            Err(WizardError::Backend(e)) => {
                                ensure_session(console)?;
                                writeln!(out, "{}", e.notice())?;
                            }
                            Err(e) => writeln!(out, "{}", e)?,
                        }
                    }
                    Some(1) => wizard.back()?,
                    _ => return cancelled(&mut out),
                }
            }
            WizardStep::Submitted => wizard.start_over(),
        }
    }
}

fn cancelled(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Order discarded")?;
    Ok(())
}

fn ensure_session(console: &Console) -> Result<()> {
    if console.session.snapshot().is_authenticated {
        Ok(())
    } else {
        anyhow::bail!("Session expired. Please log in again.")
    }
}

fn print_failures(out: &mut impl Write, report: &LoadReport) -> Result<()> {
    for failure in &report.failures {
        writeln!(
            out,
            "Could not load {}: {}",
            failure.listing,
            failure.error.notice()
        )?;
    }
    Ok(())
}

async fn pick_client(console: &Console, wizard: &mut OrderWizard, out: &mut impl Write) -> Result<bool> {
    let query = prompt::search("Search client by name, email or document")?;
    let matches: Vec<(i64, String)> = wizard
        .filter_clients(&query)
        .into_iter()
        .map(|c| (c.id, format!("{} <{}> doc {}", c.name, c.email, c.document)))
        .collect();

    if matches.is_empty() {
        writeln!(out, "No clients match \"{}\"", query)?;
        return Ok(prompt::confirm("Search again?")?);
    }

    let labels: Vec<String> = matches.iter().map(|(_, label)| label.clone()).collect();
    let Some(index) = prompt::choose("Client", &labels)? else {
        return Ok(false);
    };

    let report = wizard.select_client(&console.api, matches[index].0).await?;
    print_failures(out, &report)?;
    ensure_session(console)?;
    Ok(true)
}

fn pick_vehicle(wizard: &mut OrderWizard, out: &mut impl Write) -> Result<bool> {
    let vehicles: Vec<(i64, String)> = wizard
        .vehicles()
        .iter()
        .map(|v| (v.id, format!("{}  VIN {}", v.label(), v.vin)))
        .collect();
    if vehicles.is_empty() {
        writeln!(out, "The selected client has no vehicles")?;
    }

    let mut labels: Vec<String> = vehicles.iter().map(|(_, label)| label.clone()).collect();
    labels.push("Change client".to_string());

    match prompt::choose("Vehicle", &labels)? {
        Some(i) if i < vehicles.len() => wizard.select_vehicle(vehicles[i].0)?,
        Some(_) => wizard.change_client()?,
        None => return Ok(false),
    }
    Ok(true)
}

fn configure_service(wizard: &mut OrderWizard, out: &mut impl Write) -> Result<bool> {
    let draft = wizard.draft();
    let service_type = draft
        .service_type_id
        .and_then(|id| wizard.service_types().iter().find(|s| s.id == id))
        .map_or("-".to_string(), |s| s.name.clone());
    let mechanic = draft
        .mechanic_id
        .and_then(|id| wizard.mechanics().iter().find(|m| m.id == id))
        .map_or("-".to_string(), |m| m.name.clone());
    let date = draft
        .estimated_date
        .map_or("-".to_string(), |d| d.to_string());

    let menu = [
        (format!("Service type: {service_type}"), ServiceAction::ServiceType),
        (format!("Mechanic: {mechanic}"), ServiceAction::Mechanic),
        (format!("Estimated date: {date}"), ServiceAction::EstimatedDate),
        (format!("Add part ({} lines)", draft.part_lines.len()), ServiceAction::AddPart),
        ("Remove part".to_string(), ServiceAction::RemovePart),
        ("Change vehicle".to_string(), ServiceAction::ChangeVehicle),
        ("Change client".to_string(), ServiceAction::ChangeClient),
        ("Review order".to_string(), ServiceAction::Review),
        ("Cancel".to_string(), ServiceAction::Cancel),
    ];
    let labels: Vec<String> = menu.iter().map(|(label, _)| label.clone()).collect();
    let Some(index) = prompt::choose("Service", &labels)? else {
        return Ok(false);
    };

    let result = match menu[index].1 {
        ServiceAction::ServiceType => {
            let options: Vec<(i64, String)> = wizard
                .service_types()
                .iter()
                .map(|s| (s.id, s.name.clone()))
                .collect();
            match pick(out, "Service type", &options)? {
                Some(id) => wizard.set_service_type(id),
                None => Ok(()),
            }
        }
        ServiceAction::Mechanic => {
            let options: Vec<(i64, String)> = wizard
                .mechanics()
                .iter()
                .map(|m| (m.id, m.name.clone()))
                .collect();
            match pick(out, "Mechanic", &options)? {
                Some(id) => wizard.set_mechanic(id),
                None => Ok(()),
            }
        }
        ServiceAction::EstimatedDate => {
            let date = prompt::date("Estimated date")?;
            wizard.set_estimated_date(date)
        }
        ServiceAction::AddPart => {
            let query = prompt::search("Search part by name or code")?;
            let options: Vec<(i64, String, u32)> = wizard
                .available_parts(&query)
                .into_iter()
                .map(|p| (p.id, format!("{} [{}] @ {}", p.name, p.code, p.unit_price), p.stock))
                .collect();
            let labels: Vec<(i64, String)> =
                options.iter().map(|(id, label, _)| (*id, label.clone())).collect();
            match pick(out, "Part", &labels)? {
                Some(id) => {
                    let stock = options
                        .iter()
                        .find(|(pid, _, _)| *pid == id)
                        .map_or(0, |(_, _, stock)| *stock);
                    let quantity = prompt::quantity(stock)?;
                    wizard.add_part(id, quantity).map(|line| {
                        info!("Part {} now at {} units", line.part_id, line.quantity);
                    })
                }
                None => Ok(()),
            }
        }
        ServiceAction::RemovePart => {
            let options: Vec<(i64, String)> = wizard
                .draft()
                .part_lines
                .iter()
                .map(|l| (l.part_id, format!("{} x{}", l.part_name, l.quantity)))
                .collect();
            match pick(out, "Remove", &options)? {
                Some(id) => wizard.remove_part(id).map(|_| ()),
                None => Ok(()),
            }
        }
        ServiceAction::ChangeVehicle => wizard.change_vehicle(),
        ServiceAction::ChangeClient => wizard.change_client(),
        ServiceAction::Review => wizard.confirm(Local::now().date_naive()),
        ServiceAction::Cancel => return Ok(false),
    };

    if let Err(e) = result {
        writeln!(out, "{}", e)?;
    }
    Ok(true)
}

fn pick(out: &mut impl Write, prompt_text: &str, options: &[(i64, String)]) -> Result<Option<i64>> {
    if options.is_empty() {
        writeln!(out, "Nothing to choose from")?;
        return Ok(None);
    }
    let labels: Vec<String> = options.iter().map(|(_, label)| label.clone()).collect();
    Ok(prompt::choose(prompt_text, &labels)?.map(|i| options[i].0))
}

fn print_summary(out: &mut impl Write, summary: &OrderSummary) -> Result<()> {
    writeln!(out, "Client:         {}", summary.client.name)?;
    writeln!(out, "Vehicle:        {}", summary.vehicle.label())?;
    writeln!(out, "Service type:   {}", summary.service_type.name)?;
    writeln!(out, "Mechanic:       {}", summary.mechanic.name)?;
    writeln!(out, "Estimated date: {}", summary.estimated_date)?;
    for line in &summary.part_lines {
        writeln!(
            out,
            "  {} x{} = {}",
            line.part_name, line.quantity, line.line_total
        )?;
    }
    writeln!(out, "Parts subtotal: {}", summary.subtotal)?;
    Ok(())
}
