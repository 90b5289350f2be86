//! View statistics <-> model mapper

use std::collections::BTreeMap;

use apollo_core::entities::{DailyViews, StatsSnapshot, ViewStat};
use apollo_core::value_objects::EntityId;

use crate::models::{DailyViewModel, ViewStatModel};

impl From<&ViewStatModel> for StatsSnapshot {
    fn from(model: &ViewStatModel) -> Self {
        StatsSnapshot {
            page_count: model.page_count,
            popup_count: model.popup_count,
            total_count: model.total_count,
            last_viewed_at: model.last_viewed_at,
        }
    }
}

/// Assemble a ViewStat from its aggregate row and daily rows
pub fn view_stat_from_rows(stat: ViewStatModel, days: Vec<DailyViewModel>) -> ViewStat {
    let daily: BTreeMap<_, _> = days
        .into_iter()
        .map(|d| {
            (
                d.day,
                DailyViews {
                    page: d.page,
                    popup: d.popup,
                    total: d.total,
                },
            )
        })
        .collect();

    ViewStat {
        object_id: EntityId::new(stat.object_id),
        page_count: stat.page_count,
        popup_count: stat.popup_count,
        total_count: stat.total_count,
        last_viewed_at: stat.last_viewed_at,
        daily,
    }
}
