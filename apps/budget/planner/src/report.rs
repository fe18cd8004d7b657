//! Rendering of scenario results: comparison and breakdown tables (plain
//! text or markdown), JSON, and the owner report in Russian.

use domain_budget::{CostCategory, ScenarioCost, ScenarioKind};
use strum::IntoEnumIterator;

const COMPARISON_TITLE: &str = "Сравнение сценариев бюджета (RUB)";
const BREAKDOWN_TITLE: &str = "Детализация расходов (RUB/мес)";
const COMPARISON_HEADERS: [&str; 5] = [
    "Сценарий",
    "OPEX / мес",
    "CAPEX (аморт) / мес",
    "Итого / мес",
    "Итого / год",
];

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let mut out = String::new();
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `1234.5` -> `1,234.50`
pub fn format_rub(value: f64) -> String {
    format_grouped(value, 2)
}

/// `1234.5` -> `1,235`
pub fn format_rub_whole(value: f64) -> String {
    format_grouped(value, 0)
}

/// Whole rubles with an explicit `+` for increases
fn format_delta(value: f64) -> String {
    let text = format_rub_whole(value);
    if value > 0.0 && text != "0" {
        format!("+{text}")
    } else {
        text
    }
}

/// A titled table of text cells. The first column is a label, the rest are
/// right-aligned numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: &'static str,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(idx) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }
        widths
    }

    fn pad(cell: &str, width: usize, left: bool) -> String {
        let fill = " ".repeat(width.saturating_sub(cell.chars().count()));
        if left {
            format!("{cell}{fill}")
        } else {
            format!("{fill}{cell}")
        }
    }

    fn line(cells: &[String], widths: &[usize]) -> String {
        cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (cell, width))| Self::pad(cell, *width, idx == 0))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn to_text(&self) -> String {
        let widths = self.widths();
        let rule = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");

        let mut out = String::new();
        out.push_str(&format!("{}\n", self.title));
        out.push_str(&format!("{}\n", Self::line(&self.headers, &widths)));
        out.push_str(&format!("{rule}\n"));
        for row in &self.rows {
            out.push_str(&format!("{}\n", Self::line(row, &widths)));
        }
        out
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("### {}\n", self.title));
        out.push('\n');
        out.push_str(&format!("| {} |\n", self.headers.join(" | ")));
        let align: Vec<&str> = (0..self.headers.len())
            .map(|idx| if idx == 0 { "---" } else { "---:" })
            .collect();
        out.push_str(&format!("| {} |\n", align.join(" | ")));
        for row in &self.rows {
            out.push_str(&format!("| {} |\n", row.join(" | ")));
        }
        out
    }
}

/// Scenario, OPEX, amortized CAPEX, monthly and yearly totals
pub fn comparison_table(scenarios: &[ScenarioCost]) -> Table {
    Table {
        title: COMPARISON_TITLE,
        headers: COMPARISON_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: scenarios
            .iter()
            .map(|s| {
                vec![
                    s.scenario_name.to_string(),
                    format_rub(s.opex_monthly),
                    format_rub(s.capex_monthly()),
                    format_rub(s.total_monthly_rub),
                    format_rub(s.total_yearly_rub),
                ]
            })
            .collect(),
    }
}

/// One row per cost category, one column per scenario
pub fn breakdown_table(scenarios: &[ScenarioCost]) -> Table {
    let mut headers = vec!["Категория".to_string()];
    headers.extend(scenarios.iter().map(|s| s.scenario_name.to_string()));

    Table {
        title: BREAKDOWN_TITLE,
        headers,
        rows: CostCategory::iter()
            .map(|category| {
                let mut row = vec![category.to_string()];
                row.extend(scenarios.iter().map(|s| format_rub(s.details.get(category))));
                row
            })
            .collect(),
    }
}

fn missing_tariff_lines(scenarios: &[ScenarioCost]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for scenario in scenarios {
        for miss in &scenario.missing_tariffs {
            let line = format!("{} '{}' ({})", miss.kind, miss.key, miss.resource);
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
    }
    lines
}

/// Both tables as plain text
pub fn plan_text(scenarios: &[ScenarioCost]) -> String {
    let mut out = comparison_table(scenarios).to_text();
    out.push('\n');
    out.push_str(&breakdown_table(scenarios).to_text());

    let missing = missing_tariff_lines(scenarios);
    if !missing.is_empty() {
        out.push_str("\nНе найдены тарифы (компонент посчитан как 0):\n");
        for line in missing {
            out.push_str(&format!("  - {line}\n"));
        }
    }
    out
}

/// Both tables as markdown
pub fn plan_markdown(scenarios: &[ScenarioCost]) -> String {
    let mut out = comparison_table(scenarios).to_markdown();
    out.push('\n');
    out.push_str(&breakdown_table(scenarios).to_markdown());

    let missing = missing_tariff_lines(scenarios);
    if !missing.is_empty() {
        out.push_str("\n**Не найдены тарифы** (компонент посчитан как 0):\n\n");
        for line in missing {
            out.push_str(&format!("- {line}\n"));
        }
    }
    out
}

fn risk_note(kind: ScenarioKind) -> &'static str {
    match kind {
        ScenarioKind::AsIs => "риски старения оборудования, капитальные затраты (CAPEX).",
        ScenarioKind::MinimalCloud => {
            "гибкость для веб-нагрузок, но зависимость от облачного провайдера."
        }
        ScenarioKind::Hybrid => {
            "баланс безопасности (ПДн и КИИ остаются on-prem) и масштабируемости."
        }
    }
}

/// First scenario with the lowest yearly total
fn cheapest(scenarios: &[ScenarioCost]) -> Option<&ScenarioCost> {
    scenarios.iter().fold(None, |best: Option<&ScenarioCost>, s| match best {
        Some(b) if b.total_yearly_rub <= s.total_yearly_rub => Some(b),
        _ => Some(s),
    })
}

/// Markdown report for the company owner
pub fn owner_report(scenarios: &[ScenarioCost]) -> String {
    let mut out = String::new();
    out.push_str("# Отчет для собственника / директора\n");
    out.push('\n');

    let Some(best) = cheapest(scenarios) else {
        out.push_str("Нет рассчитанных сценариев.\n");
        return out;
    };
    let as_is = scenarios
        .iter()
        .find(|s| s.scenario_name == ScenarioKind::AsIs);

    out.push_str(&format!("**Рекомендуемый сценарий:** {}\n", best.scenario_name));
    match as_is {
        Some(current) if best.scenario_name != ScenarioKind::AsIs => {
            let savings = current.total_yearly_rub - best.total_yearly_rub;
            if current.total_yearly_rub > 0.0 {
                let pct = savings / current.total_yearly_rub * 100.0;
                out.push_str(&format!(
                    "**Экономия:** {} RUB в год ({:.1}%)\n",
                    format_rub_whole(savings),
                    pct
                ));
            } else {
                out.push_str(&format!("**Экономия:** {} RUB в год\n", format_rub_whole(savings)));
            }
        }
        Some(_) => {
            out.push_str("Текущая конфигурация (as_is) является оптимальной по стоимости.\n");
        }
        None => {}
    }

    out.push('\n');
    out.push_str("## Сравнение сценариев (итого в год)\n");
    for s in scenarios {
        let delta = match as_is {
            Some(current) if s.scenario_name != ScenarioKind::AsIs => {
                format!(" ({})", format_delta(s.total_yearly_rub - current.total_yearly_rub))
            }
            _ => String::new(),
        };
        out.push_str(&format!(
            "- **{}**: {} RUB{}\n",
            s.scenario_name,
            format_rub_whole(s.total_yearly_rub),
            delta
        ));
    }

    out.push('\n');
    out.push_str("## Риски и возможности\n");
    for s in scenarios {
        out.push_str(&format!("- **{}**: {}\n", s.scenario_name, risk_note(s.scenario_name)));
    }

    let unpriced: Vec<&str> = scenarios
        .iter()
        .flat_map(|s| s.migration.unpriced_workloads.iter().map(String::as_str))
        .collect();
    let missing = missing_tariff_lines(scenarios);
    if !missing.is_empty() || !unpriced.is_empty() {
        out.push('\n');
        out.push_str("## Ограничения расчета\n");
        if !missing.is_empty() {
            out.push_str("Для части ресурсов не найдены тарифы, их стоимость занижена:\n");
            for line in missing {
                out.push_str(&format!("- {line}\n"));
            }
        }
        if !unpriced.is_empty() {
            out.push_str(&format!(
                "Нет облачного профиля для миграции, нагрузки оставлены on-prem: {}\n",
                dedup(unpriced).join(", ")
            ));
        }
    }

    out.push('\n');
    out.push_str("---\n");
    out.push_str("Сгенерировано budget-planner\n");
    out
}

fn dedup(items: Vec<&str>) -> Vec<&str> {
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
