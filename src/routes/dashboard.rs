use std::fmt::Write;

use hyper::{header, Body, Response, StatusCode};

use crate::config::{AppConfig, Palette};
use crate::models::{DashboardMode, DashboardView, StatCard, Trend, MAX_DAYS, MIN_DAYS};
use crate::utils::escape_html;

pub const PAGE_TITLE: &str = "Interactive Data Dashboard";

fn stylesheet(palette: &Palette) -> String {
    format!(
        r#"
body {{ margin: 0; background: {bg}; color: {text}; font-family: 'Inter', -apple-system, 'Segoe UI', sans-serif; }}
.dashboard-container {{ max-width: 1000px; margin: 0 auto; padding: 24px; }}
.header {{ text-align: center; margin-bottom: 24px; }}
.dashboard-subtitle, .card-title, .card-subtitle, .footer {{ color: {muted}; }}
.control-panel {{ display: flex; flex-wrap: wrap; gap: 16px; align-items: flex-end; background: {surface}; padding: 16px; border-radius: 12px; }}
.control-item {{ display: flex; flex-direction: column; gap: 6px; }}
.control-item select, .control-item input[type=text] {{ background: {bg}; color: {text}; border: 1px solid {muted}; border-radius: 6px; padding: 6px 10px; }}
.refresh-button {{ background: {primary}; color: {text}; border: 0; border-radius: 6px; padding: 8px 16px; cursor: pointer; }}
.stats-container {{ display: flex; flex-wrap: wrap; gap: 16px; margin: 24px 0; }}
.stat-card {{ flex: 1 1 200px; background: {surface}; border-left: 4px solid; border-radius: 12px; padding: 16px; }}
.card-title {{ margin: 0; font-size: 14px; font-weight: 500; }}
.card-value {{ margin: 8px 0 0; font-size: 26px; font-weight: 700; }}
.card-change, .card-subtitle {{ margin: 4px 0 0; font-size: 13px; }}
.positive {{ color: {accent}; }}
.negative {{ color: #ef4444; }}
.unavailable {{ text-align: center; color: {muted}; }}
.chart svg {{ display: block; width: 100%; height: auto; border-radius: 12px; }}
.chart-container {{ margin-bottom: 16px; }}
.secondary-charts {{ display: flex; flex-wrap: wrap; gap: 16px; }}
.chart-half {{ flex: 1 1 400px; }}
.footer {{ margin-top: 24px; text-align: center; font-size: 13px; }}
"#,
        bg = Palette::hex(palette.background),
        surface = Palette::hex(palette.surface),
        primary = Palette::hex(palette.primary),
        accent = Palette::hex(palette.accent),
        text = Palette::hex(palette.text),
        muted = Palette::hex(palette.text_secondary),
    )
}

fn render_controls(out: &mut String, view: &DashboardView) {
    let controls = &view.controls;

    out.push_str(r#"<form class="control-panel" method="get" action="/">"#);

    out.push_str(r#"<div class="control-item"><label for="mode">Select Data Type:</label>"#);
    out.push_str(r#"<select id="mode" name="mode" onchange="toggleLocation(this.value); this.form.submit()">"#);
    for mode in DashboardMode::ALL {
        let selected = if mode == controls.mode { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{}"{}>{}</option>"#,
            mode.as_str(),
            selected,
            mode.label()
        );
    }
    out.push_str("</select></div>");

    let _ = write!(
        out,
        r#"<div class="control-item"><label for="days">Time Range (Days): <output id="days-value">{days}</output></label><input type="range" id="days" name="days" min="{min}" max="{max}" value="{days}" oninput="document.getElementById('days-value').value = this.value" onchange="this.form.submit()"></div>"#,
        days = controls.days.get(),
        min = MIN_DAYS,
        max = MAX_DAYS,
    );

    // only shown for the weather pipeline
    let display = if controls.mode == DashboardMode::Weather { "flex" } else { "none" };
    let _ = write!(
        out,
        r#"<div class="control-item" id="location-container" style="display: {}"><label for="location">Weather Location:</label><input type="text" id="location" name="location" placeholder="e.g., New York, London, Tokyo" value="{}"></div>"#,
        display,
        escape_html(&controls.location),
    );

    out.push_str(
        r#"<button class="refresh-button" type="submit" name="refresh" value="1" aria-label="Refresh dashboard data">🔄 Refresh Data</button>"#,
    );
    out.push_str("</form>");
}

fn render_card(out: &mut String, card: &StatCard) {
    let _ = write!(
        out,
        r#"<div class="stat-card" style="border-color: {}"><h3 class="card-title">{}</h3><p class="card-value">{}</p>"#,
        card.accent,
        escape_html(&card.title),
        escape_html(&card.value),
    );
    if let Some(change) = &card.change {
        let class = match card.trend {
            Some(Trend::Positive) => "positive",
            _ => "negative",
        };
        let _ = write!(out, r#"<p class="card-change {}">{}</p>"#, class, escape_html(change));
    }
    if let Some(subtitle) = &card.subtitle {
        let _ = write!(out, r#"<p class="card-subtitle">{}</p>"#, escape_html(subtitle));
    }
    out.push_str("</div>");
}

fn render_charts(out: &mut String, view: &DashboardView) {
    let mut charts = view.charts.iter();

    if let Some(main) = charts.next() {
        let _ = write!(out, r#"<div class="chart-container"><div class="chart">{}</div></div>"#, main.svg);
    }

    out.push_str(r#"<div class="secondary-charts">"#);
    for chart in charts {
        let _ = write!(out, r#"<div class="chart-half"><div class="chart">{}</div></div>"#, chart.svg);
    }
    out.push_str("</div>");
}

/// Full HTML page for one view
pub fn render_page(view: &DashboardView, config: &AppConfig) -> String {
    let mut out = String::with_capacity(64 * 1024);

    let _ = write!(
        out,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><meta http-equiv="refresh" content="{}"><title>{}</title><style>{}</style></head><body><div class="dashboard-container">"#,
        config.refresh_interval.as_secs(),
        PAGE_TITLE,
        stylesheet(&config.palette),
    );

    let _ = write!(
        out,
        r#"<header class="header"><h1 class="dashboard-title" aria-label="{title}">📊 {title}</h1><p class="dashboard-subtitle">Real-time Crypto, Weather &amp; Stock Data</p></header>"#,
        title = PAGE_TITLE,
    );

    render_controls(&mut out, view);

    out.push_str(r#"<main class="content"><div class="stats-container">"#);
    if view.cards.is_empty() {
        if let Some(message) = view.status_message() {
            let _ = write!(out, r#"<p class="unavailable">{}</p>"#, escape_html(message));
        }
    }
    for card in &view.cards {
        render_card(&mut out, card);
    }
    out.push_str("</div>");

    render_charts(&mut out, view);
    out.push_str("</main>");

    let _ = write!(
        out,
        r#"<footer class="footer">Last updated: <span id="last-update">{}</span> | Data sources: CoinGecko, Open-Meteo</footer>"#,
        escape_html(&view.last_updated),
    );

    out.push_str(
        r#"<script>function toggleLocation(mode) { document.getElementById('location-container').style.display = mode === 'weather' ? 'flex' : 'none'; }</script>"#,
    );
    out.push_str("</div></body></html>");
    out
}

pub fn html_response(body: String) -> Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(body))
        .unwrap()
}
