use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use camino::{Utf8Path, Utf8PathBuf};
use miette::{IntoDiagnostic, Result, WrapErr};
use progress_charts::query::{RecordedResponses, StaticToken};
use progress_charts::summary::{SummaryCard, profile_summary};
use progress_charts::{
    BarConfig, ChartKind, LineConfig, PieConfig, Scene, SvgOptions, fetch_dashboard_data, layout_audit_comparison,
    layout_pass_fail, layout_progression, render_svg,
};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  gallery    Render every dashboard fixture into gallery.html");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "gallery" => gallery(),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

/// One fixture rendered as summary cards plus three charts
struct Panel {
    cards: Vec<SummaryCard>,
    /// `None` where the chart has no data
    charts: Vec<(ChartKind, Option<String>)>,
}

fn render_fixture(path: &Utf8Path) -> Result<Panel> {
    let source = fs::read_to_string(path).into_diagnostic()?;
    let fixture: Value = serde_json::from_str(&source)
        .into_diagnostic()
        .wrap_err_with(|| format!("parsing {path}"))?;

    let claims = fixture.get("claims").cloned().unwrap_or(Value::Null);
    let token = format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.Z2FsbGVyeQ",
        URL_SAFE_NO_PAD.encode(claims.to_string())
    );
    let executor = RecordedResponses::from_json(fixture.get("responses").unwrap_or(&Value::Null));
    let data = fetch_dashboard_data(&StaticToken(token), &executor)?;

    let options = SvgOptions::default();
    let svg = |scene: Option<Scene>| -> Result<Option<String>> {
        scene
            .map(|s| render_svg(&s, &options).into_diagnostic())
            .transpose()
    };

    let charts = vec![
        (
            ChartKind::XpProgression,
            svg(layout_progression(&data.xp_series(), &LineConfig::default())?)?,
        ),
        (
            ChartKind::AuditComparison,
            svg(Some(layout_audit_comparison(&data.audit, &BarConfig::default())?))?,
        ),
        (
            ChartKind::PiscineStats,
            svg(layout_pass_fail(&data.piscine, &PieConfig::default())?)?,
        ),
    ];

    Ok(Panel {
        cards: profile_summary(&data),
        charts,
    })
}

fn gallery() -> Result<()> {
    let root = Utf8Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let fixtures_dir = root.join("tests/fixtures");
    let output_path = root.join("gallery.html");

    let mut fixtures: Vec<Utf8PathBuf> = fixtures_dir
        .read_dir_utf8()
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {fixtures_dir}"))?
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.extension() == Some("json"))
        .collect();
    fixtures.sort();

    let panels: Vec<(String, Result<Panel>)> = fixtures
        .par_iter()
        .map(|path| {
            let name = path.file_stem().unwrap_or(path.as_str()).to_string();
            tracing::debug!(fixture = %name, "rendering");
            (name, render_fixture(path))
        })
        .collect();

    let failed = panels.iter().filter(|(_, p)| p.is_err()).count();

    let mut html = String::new();
    html.push_str(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Progress Dashboard Gallery</title>
    <style>
        body { font-family: system-ui, sans-serif; margin: 0; background: #eee; color: #333; }
        .page { max-width: 1200px; margin: 0 auto; padding: 24px; }
        h1 { font-weight: 600; font-size: 20px; margin: 0 0 24px 0; }
        .fixture { background: white; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,0.08); margin-bottom: 16px; padding: 16px; }
        .fixture h2 { font-size: 13px; font-weight: 600; margin: 0 0 12px 0; }
        .cards { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; margin-bottom: 12px; }
        .card { border: 1px solid #e5e5e5; border-radius: 6px; padding: 8px 12px; }
        .card h3 { font-size: 11px; text-transform: uppercase; color: #666; margin: 0; }
        .card .value { font-size: 18px; font-weight: 600; margin: 4px 0 0 0; }
        .card .detail { font-size: 11px; color: #666; margin: 2px 0 0 0; }
        .chart { margin-top: 12px; }
        .no-data, .error { color: #991b1b; font-size: 13px; }
    </style>
</head>
<body>
<div class="page">
"#,
    );
    html.push_str(&format!(
        "<h1>Progress Dashboard Gallery ({} fixtures, {} failed)</h1>\n",
        panels.len(),
        failed
    ));

    for (name, panel) in &panels {
        html.push_str(&format!(
            "<div class=\"fixture\"><h2>{}</h2>\n",
            escape_html(name)
        ));
        match panel {
            Ok(panel) => {
                html.push_str(r#"<div class="cards">"#);
                for card in &panel.cards {
                    html.push_str(&format!(
                        r#"<div class="card"><h3>{}</h3><p class="value">{}</p>"#,
                        card.title,
                        escape_html(&card.value)
                    ));
                    if let Some(detail) = &card.detail {
                        html.push_str(&format!(r#"<p class="detail">{}</p>"#, escape_html(detail)));
                    }
                    html.push_str("</div>");
                }
                html.push_str("</div>\n");
                for (kind, svg) in &panel.charts {
                    match svg {
                        Some(svg) => {
                            html.push_str(&format!("<div class=\"chart\">{svg}</div>\n"));
                        }
                        None => {
                            html.push_str(&format!(
                                "<p class=\"no-data\">{}</p>\n",
                                kind.empty_message()
                            ));
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(fixture = %name, error = %e, "fixture failed");
                html.push_str(&format!(
                    "<pre class=\"error\">{}</pre>\n",
                    escape_html(&format!("{e:?}"))
                ));
            }
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n</body>\n</html>\n");

    fs::write(&output_path, html)
        .into_diagnostic()
        .wrap_err_with(|| format!("writing {output_path}"))?;
    tracing::info!(path = %output_path, fixtures = panels.len(), failed, "wrote gallery");
    Ok(())
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
