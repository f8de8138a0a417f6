use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap};

use parkdesk_core::{Registration, UiMode};

use super::{Lookup, RegistrationsScreen};
use crate::theme;
use crate::widgets::popup;

fn date(d: Option<DateTime<Utc>>) -> String {
    d.map_or_else(|| "─".into(), |d| d.format("%d/%m/%Y").to_string())
}

#[allow(clippy::cast_possible_truncation)]
fn money(amount: Option<f64>) -> String {
    amount.map_or_else(|| "─".into(), |a| format!("{} đ", a.round() as i64))
}

fn hint(key: &'static str, text: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(format!("{key} "), theme::key_hint_key()),
        Span::styled(format!("{text}  "), theme::key_hint()),
    ]
}

pub(super) fn render(screen: &RegistrationsScreen, frame: &mut Frame, area: Rect) {
    let view = &screen.view;
    let title = match view.search() {
        Some(q) => format!(" Đăng ký tháng ({}) [{}: \"{}\"] ", view.rows().len(), q.field, q.text),
        None => format!(" Đăng ký tháng ({}) ", view.rows().len()),
    };
    let block = Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if screen.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::vertical([
        Constraint::Length(1), // search / status
        Constraint::Min(1),    // table
        Constraint::Length(1), // pager
        Constraint::Length(1), // hints
    ])
    .split(inner);

    render_status_line(screen, frame, layout[0]);
    render_table(screen, frame, layout[1]);

    let page = Line::from(vec![
        Span::styled(
            format!(
                "  Trang {}/{}",
                view.pager().page(),
                view.page_count().max(1)
            ),
            theme::label(),
        ),
        Span::styled("   [ ] đổi trang", theme::key_hint()),
    ]);
    frame.render_widget(Paragraph::new(page), layout[2]);

    let mut spans = vec![Span::raw("  ")];
    for (key, text) in [
        ("a", "thêm"),
        ("u", "khách cũ"),
        ("e", "sửa"),
        ("x", "gia hạn"),
        ("s", "gia hạn TM"),
        ("p", "thanh toán"),
        ("m", "số tháng"),
        ("l", "chuỗi"),
        ("h", "lịch sử"),
        ("c", "kiểm tra"),
        ("/", "tìm"),
    ] {
        spans.extend(hint(key, text));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), layout[3]);

    if view.mode().is_modal() {
        render_modal(screen, frame, area);
    }
}

fn render_status_line(screen: &RegistrationsScreen, frame: &mut Frame, area: Rect) {
    if let Some(search) = &screen.search {
        let line = Line::from(vec![
            Span::styled(format!(" Tìm theo {} ", search.field), theme::key_hint_key()),
            Span::styled("(Tab đổi) ", theme::key_hint()),
            Span::styled(search.input.value().to_owned(), theme::table_row()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }
    if screen.view.is_busy() {
        let throbber = throbber_widgets_tui::Throbber::default()
            .label(" Đang tải dữ liệu...")
            .style(theme::label())
            .throbber_style(Style::default().fg(theme::ACCENT));
        frame.render_stateful_widget(throbber, area, &mut screen.throbber.clone());
    }
}

fn render_table(screen: &RegistrationsScreen, frame: &mut Frame, area: Rect) {
    let view = &screen.view;
    let header = Row::new(
        [
            "#", "Biển số", "Khách hàng", "Tháng", "Bắt đầu", "Hết hạn", "Số tiền", "Trạng thái",
            "Thanh toán", "GH",
        ]
        .map(|h| Cell::from(h).style(theme::table_header())),
    );

    let rows: Vec<Row> = view
        .page_rows()
        .iter()
        .map(|r| {
            let latest = if view.is_latest_in_chain(r) { "★" } else { " " };
            Row::new(vec![
                Cell::from(r.id.to_string()),
                Cell::from(r.plate.clone()).style(Style::default().fg(theme::SKY)),
                Cell::from(r.holder_name.clone().unwrap_or_default()),
                Cell::from(r.months.to_string()),
                Cell::from(date(r.starts_at)),
                Cell::from(date(r.expires_at)),
                Cell::from(money(r.amount)),
                Cell::from(r.status.label_vi()).style(theme::status_style(r.status)),
                Cell::from(r.payment_status.label_vi())
                    .style(theme::payment_style(r.payment_status)),
                Cell::from(format!("{latest}{}", r.extension_seq)),
            ])
            .style(theme::table_row())
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(4),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(theme::table_selected());

    let mut state = screen.table_state;
    frame.render_stateful_widget(table, area, &mut state);
}

// ── Modals ───────────────────────────────────────────────────────────

fn render_modal(screen: &RegistrationsScreen, frame: &mut Frame, area: Rect) {
    let mode = screen.view.mode();
    let height = match mode {
        UiMode::ExtensionChain(_) | UiMode::VehicleHistory(_) => 18,
        UiMode::ViewDetail(_) | UiMode::CheckActive | UiMode::ViewActive(_) => 16,
        _ => 12,
    };
    let modal = popup::centered(area, 72, height);
    let inner = popup::frame_modal(frame, modal, mode.title());

    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let hints: Vec<Span> = if let Some(form) = &screen.form {
        match mode {
            UiMode::CheckActive => {
                let body =
                    Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(layout[0]);
                form.render(frame, body[0]);
                render_lookup(&screen.lookup, frame, body[1]);
            }
            _ => form.render(frame, layout[0]),
        }
        let mut spans = vec![Span::raw(" ")];
        spans.extend(hint("Enter", "lưu"));
        spans.extend(hint("Tab", "chuyển ô"));
        spans.extend(hint("Esc", "đóng"));
        if matches!(mode, UiMode::Edit(_)) {
            spans.extend(hint("Ctrl+X", "hủy đăng ký"));
        }
        spans
    } else {
        match mode {
            UiMode::ViewDetail(id) => {
                if let Some(row) = screen.view.find(id) {
                    render_detail(screen, row, frame, layout[0]);
                }
            }
            _ => render_lookup(&screen.lookup, frame, layout[0]),
        }
        let mut spans = vec![Span::raw(" ")];
        spans.extend(hint("Esc", "đóng"));
        spans
    };
    frame.render_widget(Paragraph::new(Line::from(hints)), layout[1]);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<16}"), theme::label()),
        Span::styled(value, theme::table_row()),
    ])
}

fn detail_lines(row: &Registration) -> Vec<Line<'static>> {
    let now = Utc::now();
    let remaining = row
        .days_remaining(now)
        .map_or_else(|| "─".into(), |d| format!("{d} ngày"));
    vec![
        field("Mã", row.id.to_string()),
        field("Biển số", row.plate.clone()),
        field("Khách hàng", row.holder_name.clone().unwrap_or_default()),
        field("CCCD", row.cccd.clone().unwrap_or_default()),
        field("Mã nhân viên", row.employee_code.clone().unwrap_or_default()),
        field("Số tháng", row.months.to_string()),
        field("Bắt đầu", date(row.starts_at)),
        field("Hết hạn", date(row.expires_at)),
        field("Còn lại", remaining),
        field("Số tiền", money(row.amount)),
        field("Trạng thái", row.status.label_vi().to_owned()),
        field("Thanh toán", row.payment_status.label_vi().to_owned()),
        field("Lần gia hạn", row.extension_seq.to_string()),
        field("Ghi chú", row.note.clone().unwrap_or_default()),
    ]
}

fn render_detail(screen: &RegistrationsScreen, row: &Registration, frame: &mut Frame, area: Rect) {
    let mut lines = detail_lines(row);
    let flags = [
        (screen.view.is_latest_in_chain(row), "mới nhất"),
        (screen.view.can_edit(row), "sửa được"),
        (screen.view.can_extend(row), "gia hạn được"),
    ];
    let tags: Vec<&str> = flags.iter().filter(|(on, _)| *on).map(|(_, t)| *t).collect();
    if !tags.is_empty() {
        lines.push(field("", tags.join(" · ")));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_lookup(lookup: &Lookup, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = match lookup {
        Lookup::Idle => Vec::new(),
        Lookup::Loading => vec![Line::from(Span::styled("Đang tải...", theme::label()))],
        Lookup::Failed(msg) => vec![Line::from(Span::styled(msg.clone(), theme::error_text()))],
        Lookup::Active(check) => {
            let (text, style) = if check.is_active {
                ("Xe đang có vé tháng", Style::default().fg(theme::GREEN))
            } else {
                ("Xe chưa có vé tháng", Style::default().fg(theme::YELLOW))
            };
            let mut lines = vec![Line::from(Span::styled(
                format!("{}: {text}", check.plate),
                style,
            ))];
            if let Some(ref msg) = check.message {
                lines.push(Line::from(Span::styled(msg.clone(), theme::label())));
            }
            if let Some(ref reg) = check.registration {
                lines.push(field("Hết hạn", date(reg.expires_at)));
                lines.push(field("Trạng thái", reg.status.label_vi().to_owned()));
            }
            lines
        }
        Lookup::ActiveRow(None) => vec![Line::from(Span::styled(
            "Không có đăng ký đang hoạt động",
            theme::label(),
        ))],
        Lookup::ActiveRow(Some(row)) => detail_lines(row),
        Lookup::Rows(rows) if rows.is_empty() => {
            vec![Line::from(Span::styled("Không có dữ liệu", theme::label()))]
        }
        Lookup::Rows(rows) => rows
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("#{:<6}", r.id), theme::label()),
                    Span::styled(format!("{:<12}", r.plate), Style::default().fg(theme::SKY)),
                    Span::raw(format!(
                        "{} → {}  {} tháng  ",
                        date(r.starts_at),
                        date(r.expires_at),
                        r.months
                    )),
                    Span::styled(r.status.label_vi(), theme::status_style(r.status)),
                ])
            })
            .collect(),
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}
