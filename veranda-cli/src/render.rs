//! The rendering collaborator: turns composed chart specifications into a
//! static HTML report.
//!
//! Layout is owned here, not by the pipeline: slot hints map to CSS classes,
//! collapsible views become `<details>` panels, and chart bodies are drawn
//! as proportional inline bars or plain tables.

use std::error::Error;

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext,
};
use serde_json::{json, Value as JsonValue};
use veranda::{ChartBody, ChartSpec, Slot, Value};

const REPORT_TEMPLATE: &str = r#"<!doctype html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>Finca Luna Nueva Lodge - Expansión a Miami</title>
<style>
body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; color: #223; }
header p.filter { color: #575; font-weight: bold; }
.card { border: 1px solid #cdc; border-radius: 6px; padding: 1rem; margin: 1rem 0; box-sizing: border-box; }
.card.half-left, .card.half-right { display: inline-block; width: 48%; vertical-align: top; }
.card.half-left { margin-right: 2%; }
.bar-row { display: flex; align-items: center; margin: 0.2rem 0; }
.bar-label { width: 14rem; }
.bar { background: #4a7; height: 1rem; margin-right: 0.5rem; }
.error { background: #fdd; border: 1px solid #c66; padding: 0.5rem; }
table { border-collapse: collapse; }
td, th { border: 1px solid #cdc; padding: 0.3rem 0.6rem; text-align: left; }
dt { font-weight: bold; margin-top: 0.4rem; }
footer { margin-top: 2rem; color: #888; font-size: 0.8rem; }
</style>
</head>
<body>
<header>
<h1>🌿 Finca Luna Nueva Lodge - Expansión a Miami</h1>
<p>Dashboard interactivo para analizar la viabilidad de la expansión del hotel ecológico en Miami.</p>
<p class="filter">Año de análisis: {{year}}</p>
</header>
<main>
{{#each charts}}
{{#if collapsible}}
<details class="card {{slot}}">
<summary>{{title}}</summary>
{{> chart_body}}
</details>
{{else}}
<section class="card {{slot}}">
<h2>{{title}}</h2>
{{> chart_body}}
</section>
{{/if}}
{{/each}}
</main>
<footer>Dashboard del plan de mercadeo de Finca Luna Nueva Lodge en Miami (2025)</footer>
</body>
</html>
"#;

const CHART_BODY_TEMPLATE: &str = r#"{{#if error}}
<div class="error">{{error}}</div>
{{/if}}
{{#if bars}}
<div class="bars">
{{#each bars}}
<div class="bar-row"><span class="bar-label">{{label}}</span><div class="bar" style="width: {{width}}%"></div><span>{{fmt_num value}}</span></div>
{{/each}}
</div>
{{/if}}
{{#if table}}
<table>
<thead><tr>{{#each table.headers}}<th>{{this}}</th>{{/each}}</tr></thead>
<tbody>
{{#each table.rows}}
<tr>{{#each this}}<td>{{this}}</td>{{/each}}</tr>
{{/each}}
</tbody>
</table>
{{/if}}
{{#if pairs}}
<dl>
{{#each pairs}}
<dt>{{this.[0]}}</dt><dd>{{this.[1]}}</dd>
{{/each}}
</dl>
{{/if}}
"#;

/// Render the composed chart sequence into a complete HTML page.
pub fn render_html(charts: &[ChartSpec], year: i64) -> Result<String, Box<dyn Error>> {
    let mut hb = Handlebars::new();
    hb.register_helper("fmt_num", Box::new(fmt_num));
    hb.register_template_string("report", REPORT_TEMPLATE)?;
    hb.register_template_string("chart_body", CHART_BODY_TEMPLATE)?;
    let model = json!({
        "year": year,
        "charts": charts.iter().map(chart_model).collect::<Vec<JsonValue>>(),
    });
    Ok(hb.render("report", &model)?)
}

fn slot_class(slot: Slot) -> &'static str {
    match slot {
        Slot::Full => "full",
        Slot::HalfLeft => "half-left",
        Slot::HalfRight => "half-right",
        Slot::Collapsible => "collapsible",
    }
}

/// Flatten one chart specification into the shape the templates consume.
fn chart_model(chart: &ChartSpec) -> JsonValue {
    let mut model = json!({
        "title": chart.title,
        "slot": slot_class(chart.slot),
        "collapsible": chart.slot == Slot::Collapsible,
    });
    let body = match &chart.body {
        ChartBody::Bar { x, y, .. } => json!({ "bars": bar_rows(&x.values, &y.values) }),
        ChartBody::Pie { names, values } => {
            json!({ "bars": bar_rows(&names.values, &values.values) })
        }
        ChartBody::Table { columns } => {
            let headers = columns
                .iter()
                .map(|c| c.name.clone())
                .collect::<Vec<String>>();
            let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
            let rows = (0..row_count)
                .map(|i| {
                    columns
                        .iter()
                        .map(|c| c.values[i].to_string())
                        .collect::<Vec<String>>()
                })
                .collect::<Vec<Vec<String>>>();
            json!({ "table": { "headers": headers, "rows": rows } })
        }
        ChartBody::KeyValue { pairs } => json!({ "pairs": pairs }),
        ChartBody::ErrorPanel { message } => json!({ "error": message }),
    };
    if let (JsonValue::Object(m), JsonValue::Object(b)) = (&mut model, body) {
        m.extend(b);
    }
    model
}

/// Label/value/width triples for the proportional-bar rendering of bar and
/// pie bodies. Widths are percentages of the largest value.
fn bar_rows(labels: &[Value], values: &[Value]) -> Vec<JsonValue> {
    let max = values
        .iter()
        .filter_map(Value::as_f64)
        .fold(0.0_f64, f64::max);
    labels
        .iter()
        .zip(values.iter())
        .map(|(label, value)| {
            let v = value.as_f64().unwrap_or(0.0);
            let width = if max > 0.0 { (v / max * 100.0).round() } else { 0.0 };
            json!({
                "label": label.to_string(),
                "value": v,
                "width": width,
            })
        })
        .collect()
}

/// Writes a number with thousands separators, keeping up to two decimals.
///
/// Usage: `{{ fmt_num 320000 }}` produces `320,000`.
pub fn fmt_num(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let rendered = match h.param(0).map(|p| p.value()) {
        Some(JsonValue::Number(n)) => group_thousands(n.as_f64().unwrap_or(0.0)),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    out.write(&rendered)?;
    Ok(())
}

fn group_thousands(v: f64) -> String {
    let formatted = if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    };
    let negative = formatted.starts_with('-');
    let unsigned = formatted.trim_start_matches('-');
    let (int_digits, decimals) = match unsigned.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (unsigned, None),
    };
    let mut grouped = String::new();
    for (i, c) in int_digits.chars().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(decimals) = decimals {
        grouped.push('.');
        grouped.push_str(decimals);
    }
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
