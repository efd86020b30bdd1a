//! Tabular output helpers for the CLI.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::domain::models::{Mission, Step};

/// Render missions as a table.
pub fn format_mission_table(missions: &[Mission]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Title", "Status", "Created", "Finalized"]);

    for mission in missions {
        table.add_row(vec![
            Cell::new(mission.id),
            Cell::new(&mission.title),
            Cell::new(mission.status.as_str()),
            Cell::new(mission.created_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(
                mission
                    .finalized_at
                    .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            ),
        ]);
    }
    table
}

/// Render steps as a table.
pub fn format_step_table(steps: &[Step]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Title", "Status", "Worker", "Completed"]);

    for step in steps {
        table.add_row(vec![
            Cell::new(step.id),
            Cell::new(&step.title),
            Cell::new(step.status.as_str()),
            Cell::new(step.claimed_by.as_deref().unwrap_or("-")),
            Cell::new(
                step.completed_at
                    .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            ),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_mission_table_renders() {
        let missions = vec![Mission::new("Render me")];
        let rendered = format_mission_table(&missions).to_string();
        assert!(rendered.contains("Render me"));
        assert!(rendered.contains("active"));
    }

    #[test]
    fn test_step_table_renders_unclaimed() {
        let steps = vec![Step::new(Uuid::new_v4(), "Step title", "prompt")];
        let rendered = format_step_table(&steps).to_string();
        assert!(rendered.contains("Step title"));
        assert!(rendered.contains("pending"));
    }
}
