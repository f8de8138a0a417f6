//! Vehicles with their type name and the tariff table beside them.

use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use parkdesk_core::{Command, RecordId, Vehicle, VehicleType};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

pub struct VehiclesScreen {
    focused: bool,
    vehicles: Vec<Vehicle>,
    types: Vec<VehicleType>,
    type_names: HashMap<RecordId, String>,
    table_state: TableState,
    loading: bool,
}

impl VehiclesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            vehicles: Vec::new(),
            types: Vec::new(),
            type_names: HashMap::new(),
            table_state: TableState::default(),
            loading: false,
        }
    }

    fn selected(&self) -> Option<&Vehicle> {
        self.table_state.selected().and_then(|i| self.vehicles.get(i))
    }

    fn move_selection(&mut self, delta: isize) {
        if self.vehicles.is_empty() {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(self.vehicles.len() - 1);
        self.table_state.select(Some(next));
    }

    fn refresh(&mut self) -> Option<Action> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(Action::FetchVehicles)
    }

    /// The embedded name wins; otherwise look the id up in the type list.
    fn type_name(&self, vehicle: &Vehicle) -> String {
        vehicle
            .vehicle_type_name
            .clone()
            .or_else(|| {
                vehicle
                    .vehicle_type_id
                    .as_ref()
                    .and_then(|id| self.type_names.get(id).cloned())
            })
            .unwrap_or_default()
    }

    fn render_types(&self, frame: &mut Frame, area: Rect) {
        let block = block(" Loại xe ".into(), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let price = |p: Option<f64>| p.map(|p| format!("{p:.0}")).unwrap_or_default();
        let header = Row::new(
            ["Loại", "Giá tháng", "Giá lượt"].map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = self
            .types
            .iter()
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.name.clone()),
                    Cell::from(price(t.monthly_price)),
                    Cell::from(price(t.per_visit_price)),
                ])
                .style(theme::table_row())
            })
            .collect();
        let widths = [
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(10),
        ];
        frame.render_widget(Table::new(rows, widths).header(header), inner);
    }
}

fn block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

impl Component for VehiclesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('r') => return Ok(self.refresh()),
            KeyCode::Char('d') => {
                let Some(vehicle) = self.selected() else {
                    return Ok(None);
                };
                return Ok(Some(Action::ShowConfirm(ConfirmAction {
                    prompt: format!("Xóa xe {}?", vehicle.plate),
                    origin: ScreenId::Vehicles,
                    command: Box::new(Command::DeleteVehicle {
                        id: vehicle.id.clone(),
                    }),
                })));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LoggedIn(_) => return Ok(self.refresh()),
            Action::VehiclesLoaded(result) => {
                self.loading = false;
                match result {
                    Ok((vehicles, types)) => {
                        self.vehicles.clone_from(vehicles);
                        self.types.clone_from(types);
                        self.type_names = types
                            .iter()
                            .map(|t| (t.id.clone(), t.name.clone()))
                            .collect();
                        self.move_selection(0);
                    }
                    Err(_) => return Ok(Action::failure(result)),
                }
            }
            Action::CommandSucceeded {
                origin: ScreenId::Vehicles,
                ..
            } => return Ok(self.refresh()),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        let block = block(format!(" Xe ({}) ", self.vehicles.len()), self.focused);
        let inner = block.inner(cols[0]);
        frame.render_widget(block, cols[0]);
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let header = Row::new(
            ["#", "Biển số", "Loại xe", "Màu", "Chủ xe"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = self
            .vehicles
            .iter()
            .map(|v| {
                Row::new(vec![
                    Cell::from(v.id.to_string()),
                    Cell::from(v.plate.clone()).style(Style::default().fg(theme::SKY)),
                    Cell::from(self.type_name(v)),
                    Cell::from(v.color.clone().unwrap_or_default()),
                    Cell::from(v.owner_id.as_ref().map(ToString::to_string).unwrap_or_default()),
                ])
                .style(theme::table_row())
            })
            .collect();
        let widths = [
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(8),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());
        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("chọn  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("xóa  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("tải lại", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);

        self.render_types(frame, cols[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn type_name_falls_back_to_the_type_list() {
        let mut screen = VehiclesScreen::new();
        let vehicle = Vehicle {
            id: RecordId::Num(1),
            plate: "59X1-234.56".into(),
            vehicle_type_id: Some(RecordId::Num(2)),
            vehicle_type_name: None,
            owner_id: None,
            color: None,
        };
        let types = vec![VehicleType {
            id: RecordId::Num(2),
            name: "Xe máy".into(),
            monthly_price: Some(120_000.0),
            per_visit_price: Some(5_000.0),
        }];
        screen
            .update(&Action::VehiclesLoaded(Ok((vec![vehicle.clone()], types))))
            .unwrap();
        assert_eq!(screen.type_name(&vehicle), "Xe máy");
        assert_eq!(screen.selected().map(|v| v.plate.as_str()), Some("59X1-234.56"));
    }
}
