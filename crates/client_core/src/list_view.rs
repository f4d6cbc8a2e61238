use shared::{
    domain::{Vehicle, VehicleId},
    protocol::ListFilter,
};
use tracing::debug;

use crate::{api::VehicleApi, error::ClientResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Edit(VehicleId),
    Delete(VehicleId),
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Edit(_) => "Edit",
            RowAction::Delete(_) => "Delete",
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRow {
    pub id: VehicleId,
    pub type_label: String,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub details: String,
    pub actions: [RowAction; 2],
}

impl VehicleRow {
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.clone(),
            type_label: vehicle.kind().label().to_string(),
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year.to_string(),
            details: vehicle.details.clone().unwrap_or_default(),
            actions: [
                RowAction::Edit(vehicle.id.clone()),
                RowAction::Delete(vehicle.id.clone()),
            ],
        }
    }
}

const ID_COLUMN: &str = "ID";
const DATA_COLUMNS: [&str; 5] = ["Type", "Brand", "Model", "Year", "Details"];

/// Table of the last fetched vehicles. Every load replaces all rows.
#[derive(Debug, Clone, Default)]
pub struct VehicleListView {
    rows: Vec<VehicleRow>,
    show_ids: bool,
}

impl VehicleListView {
    pub fn new(show_ids: bool) -> Self {
        Self {
            rows: Vec::new(),
            show_ids,
        }
    }

    pub fn rows(&self) -> &[VehicleRow] {
        &self.rows
    }

    pub fn show_ids(&self) -> bool {
        self.show_ids
    }

    pub fn set_show_ids(&mut self, show_ids: bool) {
        self.show_ids = show_ids;
    }

    pub fn replace(&mut self, vehicles: &[Vehicle]) {
        self.rows.clear();
        self.rows.extend(vehicles.iter().map(VehicleRow::from_vehicle));
    }

    /// Fetches the collection matching `filter` and rebuilds every row.
    pub async fn load(&mut self, api: &dyn VehicleApi, filter: &ListFilter) -> ClientResult<usize> {
        let vehicles = api.list(filter).await?;
        debug!(count = vehicles.len(), ?filter, "vehicle list loaded");
        self.replace(&vehicles);
        Ok(self.rows.len())
    }

    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(DATA_COLUMNS.len() + 1);
        if self.show_ids {
            columns.push(ID_COLUMN);
        }
        columns.extend(DATA_COLUMNS);
        columns
    }

    pub fn cells<'a>(&self, row: &'a VehicleRow) -> Vec<&'a str> {
        let mut cells = Vec::with_capacity(DATA_COLUMNS.len() + 1);
        if self.show_ids {
            cells.push(row.id.as_str());
        }
        cells.extend([
            row.type_label.as_str(),
            row.brand.as_str(),
            row.model.as_str(),
            row.year.as_str(),
            row.details.as_str(),
        ]);
        cells
    }

    /// Plain-text rendering with space-padded columns.
    pub fn render_table(&self) -> String {
        let header = self.columns();
        let body: Vec<Vec<&str>> = self.rows.iter().map(|row| self.cells(row)).collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_line = |cells: &[&str]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(format_line(&header));
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("  "),
        );
        lines.extend(body.iter().map(|cells| format_line(cells)));
        lines.join("\n")
    }
}
