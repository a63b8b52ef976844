use super::ui;
use crate::core::config::AppConfig;
use crate::core::{Expense, TimeRange};
use crate::home::{HomeOptions, HomeStateHolder, UiState};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const BAR_WIDTH: usize = 30;

/// Horizontal bar per expense, scaled to the largest amount in the window.
fn render_chart(expenses: &[Expense], range: TimeRange) -> String {
    let mut output = format!(
        "{}\n",
        ui::style_text(&format!("Spending ({range})"), ui::StyleType::TotalLabel)
    );
    if expenses.is_empty() {
        output.push_str(&ui::style_text(
            "No expenses in this period",
            ui::StyleType::Subtle,
        ));
        return output;
    }

    let max = expenses
        .iter()
        .map(|e| e.amount)
        .max()
        .unwrap_or(Decimal::ZERO);
    for expense in expenses {
        let bar_len = if max > Decimal::ZERO {
            let ratio = (expense.amount / max).to_f64().unwrap_or(0.0);
            ((ratio * BAR_WIDTH as f64).round() as usize).max(1)
        } else {
            0
        };
        output.push_str(&format!(
            "{}  {:<width$} {:>10.2}  {}\n",
            expense.date,
            "█".repeat(bar_len),
            expense.amount,
            ui::style_text(&expense.category, ui::StyleType::Subtle),
            width = BAR_WIDTH,
        ));
    }
    output
}

impl UiState {
    pub fn display(&self) -> String {
        let mut output = String::new();

        if let Some(error) = &self.error {
            output.push_str(&ui::style_text(error, ui::StyleType::Error));
            output.push('\n');
        }

        let Some(snapshot) = &self.snapshot else {
            if self.error.is_none() {
                output.push_str(&ui::style_text("No data yet", ui::StyleType::Subtle));
            }
            return output;
        };

        let origin = self
            .data_origin
            .map_or("Unknown".to_string(), |o| o.to_string());
        output.push_str(&format!(
            "Hello, {}\n{}\n\n",
            ui::style_text(&snapshot.user_name, ui::StyleType::Title),
            ui::style_text(&format!("Source: {origin}"), ui::StyleType::Subtle)
        ));
        output.push_str(&format!(
            "{} {}\n\n",
            ui::style_text("Balance:", ui::StyleType::TotalLabel),
            ui::style_text(
                &format!("{:.2}", snapshot.balance),
                ui::StyleType::TotalValue
            )
        ));

        output.push_str(&render_chart(&self.chart_expenses, self.selected_range));
        output.push('\n');

        let mut recipients = ui::new_styled_table();
        recipients.set_header(vec![
            ui::header_cell("Recipient"),
            ui::header_cell("Avatar"),
            ui::header_cell("Recent amount"),
        ]);
        for recipient in &snapshot.recipients {
            recipients.add_row(vec![
                Cell::new(&recipient.name),
                ui::format_optional_cell(recipient.avatar_ref.as_deref(), str::to_string),
                Cell::new(format!("{:.2}", recipient.recent_amount))
                    .set_alignment(CellAlignment::Right),
            ]);
        }
        output.push_str(&recipients.to_string());
        output.push_str("\n\n");

        let mut transactions = ui::new_styled_table();
        transactions.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell("Recipient"),
            ui::header_cell("Category"),
            ui::header_cell("Amount"),
        ]);
        for transaction in snapshot.recent_transactions_newest_first() {
            transactions.add_row(vec![
                Cell::new(transaction.date),
                Cell::new(&transaction.recipient_name),
                Cell::new(&transaction.category),
                ui::amount_cell(transaction.amount, transaction.is_income),
            ]);
        }
        output.push_str(&transactions.to_string());

        output.push_str(&format!(
            "\n\nTotal spent: {}",
            ui::style_text(
                &format!("{:.2}", snapshot.total_expenses()),
                ui::StyleType::TotalLabel
            )
        ));
        output
    }
}

/// Loads the home screen, optionally refreshing from the network, and prints it.
pub async fn run(config: &AppConfig, range: Option<TimeRange>, refresh: bool) -> Result<()> {
    let repository = crate::build_repository(config).await?;
    let holder = HomeStateHolder::new(
        repository,
        HomeOptions {
            initial_range: range.unwrap_or(config.default_range),
            grace_period: config.grace_period(),
            ..HomeOptions::default()
        },
    );

    let spinner = ui::new_spinner("Loading cached data...");
    holder.settled().await;
    if refresh {
        spinner.set_message("Refreshing from network...");
        holder.reload();
        holder.settled().await;
    }
    spinner.finish_and_clear();

    println!("{}", holder.current().display());
    Ok(())
}
