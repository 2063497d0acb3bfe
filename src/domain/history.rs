//! Price history series and the geometry of the trend chart.

use super::entities::HistoryPoint;

/// Markup applied to every historical price before display.
///
/// Product constant carried over as-is; its rationale is not documented.
pub const HISTORY_PRICE_MARKUP: f64 = 0.15;

/// Length of the history window requested from the API.
pub const HISTORY_DAYS: u32 = 30;

pub fn apply_markup(points: &[HistoryPoint], markup: f64) -> Vec<HistoryPoint> {
    points
        .iter()
        .map(|point| HistoryPoint {
            date: point.date.clone(),
            price: point.price * (1.0 + markup),
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trend {
    pub rising: bool,
    pub change_pct: f64,
}

impl Trend {
    pub fn arrow(&self) -> &'static str {
        if self.rising {
            "↑"
        } else {
            "↓"
        }
    }
}

/// Direction and size of the move from the first to the last point.
pub fn trend(points: &[HistoryPoint]) -> Option<Trend> {
    let first = points.first()?;
    let last = points.last()?;
    let change_pct = if first.price != 0.0 {
        ((last.price - first.price) / first.price * 100.0).abs()
    } else {
        0.0
    };
    Some(Trend {
        rising: last.price >= first.price,
        change_pct,
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 200.0,
            padding_top: 20.0,
            padding_bottom: 20.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub price: f64,
    pub date: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartGeometry {
    pub points: Vec<ChartPoint>,
    pub line_path: String,
    pub area_path: String,
    pub min_price: f64,
    pub max_price: f64,
}

/// Maps a series onto SVG coordinates (origin top-left).
///
/// The highest price sits `padding_top` below the top edge, the lowest
/// `padding_bottom` above the bottom edge. A flat series is drawn on the
/// bottom guide line.
pub fn chart_geometry(points: &[HistoryPoint], layout: &ChartLayout) -> Option<ChartGeometry> {
    if points.is_empty() {
        return None;
    }

    let min_price = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let max_price = points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
    let range = if max_price - min_price > 0.0 {
        max_price - min_price
    } else {
        1.0
    };
    let drawable = (layout.height - layout.padding_top - layout.padding_bottom).max(0.0);
    let last_index = points.len().saturating_sub(1);

    let chart_points: Vec<ChartPoint> = points
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let x = if last_index == 0 {
                0.0
            } else {
                idx as f64 / last_index as f64 * layout.width
            };
            let normalized = (point.price - min_price) / range;
            let y = layout.height - layout.padding_bottom - normalized * drawable;
            ChartPoint {
                x,
                y,
                price: point.price,
                date: point.date.clone(),
            }
        })
        .collect();

    let line_path = chart_points
        .iter()
        .enumerate()
        .map(|(idx, p)| format!("{} {:.2},{:.2}", if idx == 0 { "M" } else { "L" }, p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    let area_path = format!(
        "{line_path} L {w:.2},{h:.2} L 0,{h:.2} Z",
        w = layout.width,
        h = layout.height
    );

    Some(ChartGeometry {
        points: chart_points,
        line_path,
        area_path,
        min_price,
        max_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prices: &[f64]) -> Vec<HistoryPoint> {
        prices
            .iter()
            .enumerate()
            .map(|(idx, price)| HistoryPoint {
                date: format!("2024-02-{:02}", idx + 1),
                price: *price,
            })
            .collect()
    }

    #[test]
    fn markup_raises_every_price() {
        let marked = apply_markup(&series(&[100.0, 200.0]), HISTORY_PRICE_MARKUP);
        assert!((marked[0].price - 115.0).abs() < 1e-9);
        assert!((marked[1].price - 230.0).abs() < 1e-9);
        assert_eq!(marked[1].date, "2024-02-02");
    }

    #[test]
    fn trend_reports_direction_and_size() {
        let up = trend(&series(&[100.0, 90.0, 110.0])).unwrap();
        assert!(up.rising);
        assert!((up.change_pct - 10.0).abs() < 1e-9);

        let down = trend(&series(&[200.0, 150.0])).unwrap();
        assert!(!down.rising);
        assert!((down.change_pct - 25.0).abs() < 1e-9);

        assert_eq!(trend(&series(&[0.0, 10.0])).unwrap().change_pct, 0.0);
        assert!(trend(&[]).is_none());
    }

    #[test]
    fn geometry_spans_layout() {
        let layout = ChartLayout::default();
        let geometry = chart_geometry(&series(&[10.0, 20.0, 30.0]), &layout).unwrap();
        assert_eq!(geometry.points[0].x, 0.0);
        assert_eq!(geometry.points[2].x, layout.width);
        assert_eq!(geometry.points[0].y, layout.height - layout.padding_bottom);
        assert_eq!(geometry.points[2].y, layout.padding_top);
        assert!(geometry.line_path.starts_with("M 0.00,180.00"));
        assert!(geometry.area_path.ends_with("L 0,200.00 Z"));
        assert_eq!((geometry.min_price, geometry.max_price), (10.0, 30.0));
    }

    #[test]
    fn flat_and_single_point_series_stay_finite() {
        let layout = ChartLayout::default();
        let flat = chart_geometry(&series(&[50.0, 50.0, 50.0]), &layout).unwrap();
        assert!(flat.points.iter().all(|p| p.y.is_finite() && p.x.is_finite()));

        let single = chart_geometry(&series(&[42.0]), &layout).unwrap();
        assert_eq!(single.points.len(), 1);
        assert_eq!(single.points[0].x, 0.0);
        assert!(chart_geometry(&[], &layout).is_none());
    }
}
