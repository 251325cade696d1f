//! SVG line charts for a route report, plus an `index.html` that shows them
//! side by side in a browser.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use route_weather_core::{Metric, RouteReport};

const CHART_SIZE: (u32, u32) = (1024, 480);

/// Renders one SVG per metric into `out_dir` and returns the path of the index page.
pub fn render_report(report: &RouteReport, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    for metric in Metric::all() {
        let path = out_dir.join(chart_file_name(*metric));
        render_metric(report, *metric, &path)
            .with_context(|| format!("Failed to render {} chart", metric.title()))?;
        tracing::debug!(path = %path.display(), "Chart written");
    }

    let index = out_dir.join("index.html");
    fs::write(&index, index_html(report))
        .with_context(|| format!("Failed to write {}", index.display()))?;

    Ok(index)
}

fn chart_file_name(metric: Metric) -> String {
    format!("{}.svg", metric.file_stem())
}

fn render_metric(report: &RouteReport, metric: Metric, path: &Path) -> Result<()> {
    let (Some(first), Some(last)) = (report.dates.first(), report.dates.last()) else {
        bail!("Route report has no dates to plot");
    };
    // Pad by a day on each side so single-day routes still get a visible axis.
    let x_range = (*first - Duration::days(1))..(*last + Duration::days(1));

    let (lo, hi) = report.range(metric).unwrap_or((0.0, 1.0));
    let pad = ((hi - lo) * 0.1).max(1.0);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(metric.title(), ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, (lo - pad)..(hi + pad))?;

    chart
        .configure_mesh()
        .x_labels(report.dates.len() + 2)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .x_desc("Date")
        .y_desc(metric.axis_label())
        .draw()?;

    for (idx, series) in report.series(metric).into_iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        let points: Vec<(NaiveDate, f64)> = report
            .dates
            .iter()
            .zip(&series.values)
            .filter_map(|(d, v)| v.map(|v| (*d, v)))
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)).point_size(4))?
            .label(series.city)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn index_html(report: &RouteReport) -> String {
    let cities: Vec<String> = report.cities.iter().map(|c| escape_html(&c.city)).collect();
    let title = format!("Weather along the route: {}", cities.join(" &rarr; "));

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("<style>body{font-family:sans-serif;margin:2em}");
    html.push_str("img{display:block;max-width:100%;margin-bottom:2em}</style>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str(&format!("<p>Forecast days: {}</p>\n", report.dates.len()));
    for metric in Metric::all() {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            chart_file_name(*metric),
            metric.title()
        ));
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_weather_core::{ForecastEntry, route::CitySeries};

    fn report() -> RouteReport {
        let entry = ForecastEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            temp_min_c: -1.0,
            temp_max_c: 3.0,
            wind_speed_kmh: 12.0,
            rain_probability: 40.0,
            humidity_pct: 75.0,
            description: "Cloudy".to_string(),
        };
        RouteReport::new(vec![
            CitySeries {
                city: "Moscow".into(),
                entries: vec![entry.clone()],
            },
            CitySeries {
                city: "<Tver>".into(),
                entries: vec![entry],
            },
        ])
    }

    #[test]
    fn index_links_every_chart() {
        let html = index_html(&report());

        for name in ["temperature.svg", "wind.svg", "humidity.svg", "rain.svg"] {
            assert!(html.contains(name), "missing {name}");
        }
        assert!(html.contains("Moscow &rarr; &lt;Tver&gt;"));
        assert!(html.contains("Forecast days: 1"));
    }

    #[test]
    fn empty_report_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_metric(
            &RouteReport::new(Vec::new()),
            Metric::Humidity,
            &dir.path().join("humidity.svg"),
        )
        .unwrap_err();

        assert!(err.to_string().contains("no dates"));
    }
}
