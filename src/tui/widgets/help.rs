use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Config;
use crate::tui::widgets::color::Palette;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config, palette: &Palette) {
    let popup = popup_area(area, 70, 80);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("راهنما - کلیدها")
                .title_alignment(Alignment::Center)
                .style(palette.base()),
        )
        .style(palette.base())
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup);
}

/// Centered rect taking the given percentages of `area`
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub fn build_help_text(config: &Config) -> String {
    let k = &config.key_bindings;
    let mut text = String::new();

    text.push_str("عمومی:\n");
    text.push_str(&format!("  {} / {}: زبانه بعدی / قبلی\n", key(&k.tab_next), key(&k.tab_prev)));
    text.push_str(&format!(
        "  {} / {} / {}: تقویم / نقشه راه / بخش‌ها\n",
        key(&k.tab_1),
        key(&k.tab_2),
        key(&k.tab_3)
    ));
    text.push_str(&format!("  {}: مورد جدید\n", key(&k.new)));
    text.push_str(&format!("  {} / Enter: ویرایش\n", key(&k.edit)));
    text.push_str(&format!("  {}: حذف\n", key(&k.delete)));
    text.push_str(&format!("  {}: راهنما\n", key(&k.help)));
    text.push_str(&format!("  {}: خروج\n", key(&k.quit)));
    text.push('\n');

    text.push_str("تقویم:\n");
    text.push_str(&format!("  {} / {}: روز قبل / بعد\n", key(&k.day_prev), key(&k.day_next)));
    text.push_str(&format!("  {} / {}: هفته قبل / بعد\n", key(&k.week_prev), key(&k.week_next)));
    text.push_str(&format!("  {} / {}: ماه قبل / بعد\n", key(&k.prev_month), key(&k.next_month)));
    text.push_str(&format!("  {} / {}: یادداشت قبلی / بعدی\n", key(&k.list_up), key(&k.list_down)));
    text.push_str(&format!("  {}: شمسی / میلادی\n", key(&k.toggle_calendar)));
    text.push_str(&format!("  {}: امروز\n", key(&k.go_today)));
    text.push('\n');

    text.push_str("نقشه راه:\n");
    text.push_str(&format!("  {}: جستجو\n", key(&k.search)));
    text.push_str(&format!("  {}: نمای ماهانه / فصلی / سالانه\n", key(&k.cycle_view)));
    text.push_str(&format!(
        "  {} / {} / {}: فیلتر انجام شده / در حال انجام / برنامه‌ریزی شده\n",
        key(&k.filter_completed),
        key(&k.filter_ongoing),
        key(&k.filter_planned)
    ));
    text.push_str(&format!("  {}: انتخاب و جابه‌جایی تاریخ دو رویداد (Esc لغو)\n", key(&k.mark_drag)));
    text.push('\n');

    text.push_str("بخش‌ها:\n");
    text.push_str(&format!("  {}: فعال / غیرفعال\n", key(&k.toggle_section)));
    text.push('\n');

    text.push_str("فرم:\n");
    text.push_str(&format!("  {} / Enter: ذخیره\n", key(&k.save)));
    text.push_str("  Tab / ↓ , BackTab / ↑: فیلد بعدی / قبلی\n");
    text.push_str("  Ctrl+z: بازگردانی\n");
    text.push_str("  Esc: انصراف\n");

    text
}
