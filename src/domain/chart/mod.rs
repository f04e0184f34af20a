//! Plotly-compatible chart payloads.
//!
//! [`build`] turns an [`AggregatedSeries`] into line traces plus a layout;
//! [`build_bars`] produces the horizontal bar chart. The payload is plain
//! data: the dashboard hands it to `Plotly.react` as is.

pub mod variant;

use serde::{Deserialize, Serialize};

use crate::domain::aggregation::AggregatedSeries;
use crate::error::AppError;
use crate::utils::stats::{max_defined, mean_defined};

pub use variant::{ChartContext, ChartVariant, render};

/// Series with at most this many points are drawn with markers.
pub const MARKER_THRESHOLD: usize = 10;

pub const PERCENT_TICK_FORMAT: &str = ",.0%";

/// Value-axis range used for shares and participation rates.
pub const SHARE_RANGE: [f64; 2] = [0.0, 1.02];

const AVERAGE_COLOR: &str = "rgba(153, 153, 153, 0.5)";
const AVERAGE_NAME: &str = "average";
const AVERAGE_GROUP: &str = "average";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceMode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

impl TraceMode {
    /// Markers only while the series is short enough to read them.
    pub fn for_len(points: usize) -> Self {
        if points > MARKER_THRESHOLD {
            TraceMode::Lines
        } else {
            TraceMode::LinesMarkers
        }
    }
}

/// One axis of a trace: category labels or numeric values with gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValues {
    Labels(Vec<String>),
    Numbers(Vec<Option<f64>>),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Labels(v) => v.len(),
            AxisValues::Numbers(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TraceMode>,
    pub x: AxisValues,
    pub y: AxisValues,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub orientation: String,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            x: 1.01,
            y: 0.5,
            orientation: "v".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub t: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self { t: 80 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: AxisLayout,
    pub yaxis: AxisLayout,
    pub legend: Legend,
    pub margin: Margin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// How the value axis range is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ValueRange {
    /// `[-0.02 * max, 1.1 * max]` over the plotted series.
    #[default]
    Padded,
    Fixed([f64; 2]),
}

impl ValueRange {
    fn resolve<'a, I>(&self, values: I) -> [f64; 2]
    where
        I: IntoIterator<Item = &'a Option<f64>>,
    {
        match self {
            ValueRange::Fixed(range) => *range,
            ValueRange::Padded => match max_defined(values) {
                Some(max) if max > 0.0 => [-0.02 * max, 1.1 * max],
                _ => [0.0, 1.0],
            },
        }
    }
}

/// Presentation of one plotted measure.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub measure: String,
    pub name: String,
    pub color: Option<String>,
    pub width: Option<f64>,
}

impl SeriesStyle {
    pub fn new(measure: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            measure: measure.into(),
            name: name.into(),
            color: None,
            width: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    fn line(&self) -> Option<LineStyle> {
        if self.color.is_none() && self.width.is_none() {
            return None;
        }
        Some(LineStyle {
            color: self.color.clone(),
            width: self.width,
            dash: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayParams {
    pub title: String,
    pub series: Vec<SeriesStyle>,
    pub value_range: ValueRange,
    pub averages: bool,
    /// Give every series its own legend group.
    pub grouped_legend: bool,
}

impl DisplayParams {
    pub fn new(title: impl Into<String>, series: Vec<SeriesStyle>) -> Self {
        Self {
            title: title.into(),
            series,
            value_range: ValueRange::Padded,
            averages: false,
            grouped_legend: false,
        }
    }

    pub fn value_range(mut self, range: ValueRange) -> Self {
        self.value_range = range;
        self
    }

    pub fn with_averages(mut self) -> Self {
        self.averages = true;
        self
    }

    pub fn grouped_legend(mut self) -> Self {
        self.grouped_legend = true;
        self
    }
}

fn layout(title: &str, xaxis: AxisLayout, yaxis: AxisLayout) -> Layout {
    Layout {
        title: Title {
            text: title.to_string(),
        },
        xaxis,
        yaxis,
        legend: Legend::default(),
        margin: Margin::default(),
        barmode: None,
    }
}

/// Builds a line chart with one trace per styled measure.
///
/// # Errors
///
/// Returns [`AppError::Internal`] when a style names a measure the series
/// does not carry.
pub fn build(series: &AggregatedSeries, params: &DisplayParams) -> Result<ChartPayload, AppError> {
    let labels = series.labels();
    let n = labels.len();
    let mode = TraceMode::for_len(n);

    let columns = params
        .series
        .iter()
        .map(|style| {
            series.column(&style.measure).ok_or_else(|| {
                AppError::internal(
                    "Chart references an unknown measure",
                    serde_json::json!({ "measure": style.measure }),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut data: Vec<Trace> = params
        .series
        .iter()
        .zip(&columns)
        .enumerate()
        .map(|(i, (style, values))| Trace {
            kind: TraceKind::Scatter,
            name: style.name.clone(),
            mode: Some(mode),
            x: AxisValues::Labels(labels.clone()),
            y: AxisValues::Numbers(values.clone()),
            line: style.line(),
            legendgroup: params.grouped_legend.then(|| format!("group{i}")),
            showlegend: None,
            orientation: None,
        })
        .collect();

    if params.averages {
        let means = columns
            .iter()
            .enumerate()
            .filter_map(|(i, values)| mean_defined(values).map(|mean| (i, mean)));
        for (i, mean) in means {
            data.push(Trace {
                kind: TraceKind::Scatter,
                name: AVERAGE_NAME.to_string(),
                mode: Some(TraceMode::Lines),
                x: AxisValues::Labels(labels.clone()),
                y: AxisValues::Numbers(vec![Some(mean); n]),
                line: Some(LineStyle {
                    color: Some(AVERAGE_COLOR.to_string()),
                    width: Some(2.0),
                    dash: Some("dot".to_string()),
                }),
                legendgroup: Some(AVERAGE_GROUP.to_string()),
                showlegend: (i > 0).then_some(false),
                orientation: None,
            });
        }
    }

    let len = n as f64;
    let x_range = if n > MARKER_THRESHOLD {
        [-1.0, len]
    } else {
        [-0.1 * len, len - 1.0 + 0.1 * len]
    };

    let xaxis = AxisLayout {
        range: Some(x_range),
        showgrid: Some(false),
        ..Default::default()
    };
    let yaxis = AxisLayout {
        range: Some(params.value_range.resolve(columns.iter().flatten())),
        tickformat: Some(PERCENT_TICK_FORMAT.to_string()),
        ..Default::default()
    };

    Ok(ChartPayload {
        data,
        layout: layout(&params.title, xaxis, yaxis),
    })
}

/// One set of bars, aligned with the category list.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Builds a horizontal grouped bar chart; the first category is drawn on top.
///
/// # Errors
///
/// Returns [`AppError::Internal`] when a bar series is not aligned with the
/// categories.
pub fn build_bars(
    title: &str,
    categories: &[String],
    bars: &[BarSeries],
    value_range: ValueRange,
) -> Result<ChartPayload, AppError> {
    if let Some(bad) = bars.iter().find(|b| b.values.len() != categories.len()) {
        return Err(AppError::internal(
            "Bar series length does not match categories",
            serde_json::json!({
                "series": bad.name,
                "values": bad.values.len(),
                "categories": categories.len(),
            }),
        ));
    }

    let data = bars
        .iter()
        .map(|bar| Trace {
            kind: TraceKind::Bar,
            name: bar.name.clone(),
            mode: None,
            x: AxisValues::Numbers(bar.values.clone()),
            y: AxisValues::Labels(categories.to_vec()),
            line: None,
            legendgroup: None,
            showlegend: None,
            orientation: Some("h".to_string()),
        })
        .collect();

    let xaxis = AxisLayout {
        range: Some(value_range.resolve(bars.iter().flat_map(|b| &b.values))),
        tickformat: Some(PERCENT_TICK_FORMAT.to_string()),
        ..Default::default()
    };
    let yaxis = AxisLayout {
        autorange: Some("reversed".to_string()),
        ..Default::default()
    };

    let mut payload = ChartPayload {
        data,
        layout: layout(title, xaxis, yaxis),
    };
    payload.layout.barmode = Some("group".to_string());
    Ok(payload)
}
