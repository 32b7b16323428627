//! Salary vs experience scatter with per-category trend lines.

use std::collections::BTreeMap;

use salary_dataset::{CategoryColumn, Dataset};

use super::histogram::SALARY_LABEL;
use super::palette::{Palette, Rgba};
use super::regression::{fit_ols, Point, TrendLine};
use crate::subset::FilteredSubset;

/// Chart title.
pub const SCATTER_TITLE: &str = "Salary vs Experience";
/// Experience axis label.
pub const EXPERIENCE_LABEL: &str = "Years of Experience";
/// Marker size of points in the filtered subset.
pub const EMPHASIZED_SIZE: f64 = 10.0;
/// Marker size of context points outside the subset.
pub const CONTEXT_SIZE: f64 = 5.0;

/// One record drawn in the scatter view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterPoint {
    /// Record position in the dataset.
    pub position: u32,
    /// Experience years.
    pub x: f64,
    /// Monthly salary.
    pub y: f64,
    /// Value of the grouping column.
    pub group: String,
    /// Department, shown on hover.
    pub department: String,
    /// True if the record is in the filtered subset.
    pub emphasized: bool,
    /// Marker colour.
    pub color: Rgba,
    /// Marker size.
    pub size: f64,
}

/// OLS line of one group's filtered points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupTrend {
    /// Group value.
    pub group: String,
    /// Line colour.
    pub color: Rgba,
    /// Points the line was fitted on.
    pub points: usize,
    /// The fitted line.
    pub line: TrendLine,
}

/// Scatter payload.
///
/// `points` lists context points before emphasized ones so the filtered
/// subset is drawn on top.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterView {
    /// Chart title.
    pub title: String,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// Column the points are coloured and grouped by.
    pub grouping: CategoryColumn,
    /// Every record of the dataset.
    pub points: Vec<ScatterPoint>,
    /// One line per group with a defined fit, in group order.
    pub trends: Vec<GroupTrend>,
    /// Line over the whole filtered subset.
    pub overall_trend: Option<TrendLine>,
}

impl ScatterView {
    /// Builds the view; `None` when the subset is empty.
    pub fn build(
        dataset: &Dataset,
        subset: &FilteredSubset,
        grouping: CategoryColumn,
        palette: &Palette,
    ) -> Option<Self> {
        if subset.is_empty() {
            return None;
        }

        let registry = dataset.registry(grouping);
        let color_index = |group: &str| registry.code(group).map_or(0, |code| code as usize);

        let mut context = Vec::new();
        let mut emphasized = Vec::with_capacity(subset.len());
        let mut groups: BTreeMap<&str, Vec<Point>> = BTreeMap::new();

        for (position, record) in (0u32..).zip(dataset.records()) {
            let group = record.category(grouping);
            let colors = palette.variants(color_index(group));
            let in_subset = subset.contains(position);
            let point = ScatterPoint {
                position,
                x: f64::from(record.experience_years),
                y: record.monthly_salary,
                group: group.to_string(),
                department: record.department.clone(),
                emphasized: in_subset,
                color: if in_subset { colors.opaque } else { colors.faded },
                size: if in_subset { EMPHASIZED_SIZE } else { CONTEXT_SIZE },
            };

            if in_subset {
                groups
                    .entry(group)
                    .or_default()
                    .push(Point::new(point.x, point.y));
                emphasized.push(point);
            } else {
                context.push(point);
            }
        }

        let trends = groups
            .iter()
            .filter_map(|(group, points)| {
                let line = fit_ols(points)?;
                Some(GroupTrend {
                    group: (*group).to_string(),
                    color: palette.variants(color_index(*group)).darker,
                    points: points.len(),
                    line,
                })
            })
            .collect();

        let all: Vec<Point> = emphasized.iter().map(|p| Point::new(p.x, p.y)).collect();
        let overall_trend = fit_ols(&all);

        context.extend(emphasized);

        Some(Self {
            title: SCATTER_TITLE.to_string(),
            x_label: EXPERIENCE_LABEL.to_string(),
            y_label: SALARY_LABEL.to_string(),
            grouping,
            points: context,
            trends,
            overall_trend,
        })
    }

    /// Points in the filtered subset.
    pub fn emphasized(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.points.iter().filter(|p| p.emphasized)
    }

    /// Trend line of one group, if fitted.
    pub fn trend(&self, group: &str) -> Option<&GroupTrend> {
        self.trends.iter().find(|t| t.group == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salary_dataset::Record;

    fn create_test_dataset() -> Dataset {
        Dataset::from_records(vec![
            Record::new("Läkare", "Akuten", "Specialist", 2, 40_000.0),
            Record::new("Läkare", "Akuten", "Specialist", 10, 56_000.0),
            Record::new("Läkare", "Kirurgen", "Nej", 4, 30_000.0),
            Record::new("Sjuksköterska", "Kirurgen", "Nej", 8, 34_000.0),
            Record::new("Sjuksköterska", "Kirurgen", "Nej", 20, 60_000.0),
        ])
    }

    #[test]
    fn test_scatter_empty_subset() {
        let dataset = create_test_dataset();
        let view = ScatterView::build(
            &dataset,
            &FilteredSubset::empty(),
            CategoryColumn::JobTitle,
            &Palette::default(),
        );
        assert!(view.is_none());
    }

    #[test]
    fn test_scatter_emphasis() {
        let dataset = create_test_dataset();
        let subset = FilteredSubset::from_positions([0, 1]);
        let view = ScatterView::build(
            &dataset,
            &subset,
            CategoryColumn::JobTitle,
            &Palette::default(),
        )
        .unwrap();

        assert_eq!(view.points.len(), dataset.len());
        assert_eq!(view.emphasized().count(), 2);
        // Context first, emphasized on top.
        assert!(!view.points[0].emphasized);
        assert!(view.points[view.points.len() - 1].emphasized);

        for point in &view.points {
            if point.emphasized {
                assert_eq!(point.size, EMPHASIZED_SIZE);
                assert_eq!(point.color.a, 1.0);
            } else {
                assert_eq!(point.size, CONTEXT_SIZE);
                assert!(point.color.a < 1.0);
            }
        }
    }

    #[test]
    fn test_scatter_colors_stable_across_filters() {
        let dataset = create_test_dataset();
        let palette = Palette::default();
        let all = FilteredSubset::from_positions(0..5);
        let nurses = FilteredSubset::from_positions([3, 4]);

        let wide = ScatterView::build(&dataset, &all, CategoryColumn::JobTitle, &palette).unwrap();
        let narrow =
            ScatterView::build(&dataset, &nurses, CategoryColumn::JobTitle, &palette).unwrap();

        let wide_color = wide.trend("Sjuksköterska").unwrap().color;
        let narrow_color = narrow.trend("Sjuksköterska").unwrap().color;
        assert_eq!(wide_color, narrow_color);
        assert_eq!(wide_color, palette.variants(1).darker);
    }

    #[test]
    fn test_scatter_group_trends() {
        let dataset = create_test_dataset();
        let subset = FilteredSubset::from_positions(0..5);
        let view = ScatterView::build(
            &dataset,
            &subset,
            CategoryColumn::Department,
            &Palette::default(),
        )
        .unwrap();

        assert_eq!(view.trends.len(), 2);
        let akuten = view.trend("Akuten").unwrap();
        assert_eq!(akuten.points, 2);
        assert!((akuten.line.slope - 2_000.0).abs() < 1e-9);
        assert_eq!(akuten.line.start.x, 2.0);
        assert_eq!(akuten.line.end.x, 10.0);

        let kirurgen = view.trend("Kirurgen").unwrap();
        assert_eq!(kirurgen.points, 3);
        assert_eq!(kirurgen.line.start.x, 4.0);
        assert_eq!(kirurgen.line.end.x, 20.0);

        assert!(view.overall_trend.is_some());
    }

    #[test]
    fn test_scatter_single_point_group_has_no_trend() {
        let dataset = create_test_dataset();
        let subset = FilteredSubset::from_positions([2, 3, 4]);
        let view = ScatterView::build(
            &dataset,
            &subset,
            CategoryColumn::JobTitle,
            &Palette::default(),
        )
        .unwrap();

        assert!(view.trend("Läkare").is_none());
        assert!(view.trend("Sjuksköterska").is_some());
    }

    #[test]
    fn test_scatter_colors_cycle_past_palette() {
        let records = (0..7u32)
            .flat_map(|g| {
                let title = format!("G{g}");
                [
                    Record::new(&title, "D", "Nej", 1, 30_000.0),
                    Record::new(&title, "D", "Nej", 5 + g, 40_000.0),
                ]
            })
            .collect();
        let dataset = Dataset::from_records(records);
        let palette = Palette::default();
        assert_eq!(palette.len(), 5);

        let subset = FilteredSubset::from_positions(0..14);
        let view = ScatterView::build(&dataset, &subset, CategoryColumn::JobTitle, &palette)
            .unwrap();

        let color_of = |group: &str| {
            view.points
                .iter()
                .find(|p| p.group == group)
                .map(|p| p.color)
                .unwrap()
        };
        assert_eq!(color_of("G0"), color_of("G5"));
        assert_eq!(color_of("G1"), color_of("G6"));
        assert_ne!(color_of("G0"), color_of("G1"));
        assert_eq!(
            view.trend("G0").unwrap().color,
            view.trend("G5").unwrap().color
        );
    }
}
