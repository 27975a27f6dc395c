use client_core::{BadgeCategory, TableRow};
use shared::domain::Customer;

const HEADERS: [&str; 5] = ["ID", "Customer", "Date", "Status", "Address"];
const RESET: &str = "\x1b[0m";

fn badge_color(badge: BadgeCategory) -> &'static str {
    match badge {
        BadgeCategory::Warning => "\x1b[33m",
        BadgeCategory::Success => "\x1b[32m",
        BadgeCategory::Danger => "\x1b[31m",
        BadgeCategory::Secondary => "\x1b[90m",
    }
}

/// Plain-text table. A placeholder row spans the whole width.
pub fn format_table(rows: &[TableRow], color: bool) -> String {
    let cells: Vec<Option<([String; 5], BadgeCategory)>> = rows
        .iter()
        .map(|row| {
            row.as_order().map(|order| {
                (
                    [
                        order
                            .order_id
                            .map_or_else(|| "-".to_string(), |id| id.to_string()),
                        order.customer_name.clone(),
                        order.date.clone(),
                        order.status_label.clone(),
                        order.shipping_address.clone(),
                    ],
                    order.badge,
                )
            })
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for (values, _) in cells.iter().flatten() {
        for (width, value) in widths.iter_mut().zip(values) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths, None);
    let total = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    out.push_str(&"-".repeat(total));
    out.push('\n');

    for (row, cell) in rows.iter().zip(&cells) {
        match (row, cell) {
            (_, Some((values, badge))) => {
                let highlight = color.then(|| badge_color(*badge));
                push_line(&mut out, values, &widths, highlight);
            }
            (TableRow::Placeholder { text, .. }, None) => {
                let pad = total.saturating_sub(text.chars().count()) / 2;
                out.push_str(&" ".repeat(pad));
                out.push_str(text);
                out.push('\n');
            }
            (TableRow::Order(_), None) => {}
        }
    }
    out
}

fn push_line(out: &mut String, values: &[String; 5], widths: &[usize; 5], status_color: Option<&str>) {
    let mut parts = Vec::with_capacity(values.len());
    for (idx, (value, width)) in values.iter().zip(widths).enumerate() {
        let padded = format!("{value:<width$}");
        match status_color {
            Some(code) if idx == 3 => parts.push(format!("{code}{padded}{RESET}")),
            _ => parts.push(padded),
        }
    }
    out.push_str(parts.join(" | ").trim_end());
    out.push('\n');
}

pub fn format_customers(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return "No customers registered\n".to_string();
    }
    customers
        .iter()
        .map(|c| format!("{:>5}  {}\n", c.id.0, c.name))
        .collect()
}

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod tests;
