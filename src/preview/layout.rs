/// Fixed certificate layout producing a display list

use super::paint::{Anchor, Color, PaintCommand, TextRun, Weight};
use super::view::{CertificateView, CERTIFY_LINE, COMMENDATION};

/// Size of the certificate canvas in CSS pixels (4:3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self { width: 1024, height: 768 }
    }
}

/// Rough advance of one glyph relative to the font size
const GLYPH_ADVANCE: f32 = 0.52;

const WORDMARK_COLORS: [Color; 6] = [
    Color::BLUE_500,
    Color::RED_500,
    Color::YELLOW_500,
    Color::BLUE_500,
    Color::GREEN_500,
    Color::RED_500,
];

pub fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_ADVANCE
}

/// Greedy word wrap so that every line fits into `max_width`
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let chars_per_line = ((max_width / (size * GLYPH_ADVANCE)) as usize).max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        if cur.chars().count() + word.chars().count() + 1 > chars_per_line && !cur.is_empty() {
            lines.push(cur);
            cur = word.to_string();
        } else {
            if !cur.is_empty() {
                cur.push(' ');
            }
            cur.push_str(word);
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

fn text(x: f32, y: f32, size: f32, anchor: Anchor, runs: Vec<TextRun>) -> PaintCommand {
    PaintCommand::Text { x, y, size, anchor, italic: false, runs }
}

fn corner(points: [(f32, f32); 3], stroke: Color) -> PaintCommand {
    PaintCommand::Polyline { points: points.to_vec(), stroke, width: 4.0, opacity: 0.4 }
}

/// Lay out the certificate on `canvas`.
pub fn layout_certificate(view: &CertificateView, canvas: Canvas) -> Vec<PaintCommand> {
    let w = canvas.width as f32;
    let h = canvas.height as f32;
    let cx = w / 2.0;
    let mut cmds = Vec::new();

    // sheet
    cmds.push(PaintCommand::Rect {
        x: 1.0,
        y: 1.0,
        width: w - 2.0,
        height: h - 2.0,
        radius: 8.0,
        fill: Some(Color::WHITE),
        stroke: Some((Color::GRAY_200, 2.0)),
        opacity: 1.0,
    });

    // background pattern
    for (fx, fy, r, fill) in [
        (0.25, 0.25, 64.0, Color::BLUE_200),
        (0.75, 0.75, 48.0, Color::GREEN_200),
        (0.667, 0.333, 32.0, Color::RED_200),
    ] {
        cmds.push(PaintCommand::Circle { cx: w * fx, cy: h * fy, r, fill, opacity: 0.05 });
    }

    // corner brackets
    let (m, s) = (24.0, 48.0);
    cmds.push(corner([(m, m + s), (m, m), (m + s, m)], Color::BLUE_300));
    cmds.push(corner([(w - m - s, m), (w - m, m), (w - m, m + s)], Color::RED_300));
    cmds.push(corner([(m, h - m - s), (m, h - m), (m + s, h - m)], Color::GREEN_300));
    cmds.push(corner([(w - m - s, h - m), (w - m, h - m), (w - m, h - m - s)], Color::YELLOW_300));

    // wordmark
    if let Some(mark) = view.wordmark.as_deref() {
        let runs = mark
            .chars()
            .enumerate()
            .map(|(i, c)| TextRun::bold(c.to_string(), WORDMARK_COLORS[i % WORDMARK_COLORS.len()]))
            .collect();
        cmds.push(text(cx, 112.0, 40.0, Anchor::Middle, runs));
    }

    // heading pill
    let heading = view.heading();
    let pill_w = estimate_width(&heading, 22.0) + 64.0;
    let (pill_h, pill_y) = (56.0, 150.0);
    let pill_x = cx - pill_w / 2.0;
    cmds.push(PaintCommand::Rect {
        x: pill_x,
        y: pill_y,
        width: pill_w,
        height: pill_h,
        radius: pill_h / 2.0,
        fill: Some(Color::INDIGO_500),
        stroke: None,
        opacity: 1.0,
    });
    cmds.push(PaintCommand::Circle { cx: pill_x + 8.0, cy: pill_y + 8.0, r: 16.0, fill: Color::ORANGE_400, opacity: 0.8 });
    cmds.push(PaintCommand::Circle {
        cx: pill_x + pill_w - 4.0,
        cy: pill_y + pill_h - 4.0,
        r: 12.0,
        fill: Color::TEAL_400,
        opacity: 0.8,
    });
    cmds.push(text(cx, pill_y + 36.0, 22.0, Anchor::Middle, vec![TextRun {
        text: heading,
        fill: Color::WHITE,
        weight: Weight::Medium,
        underline: false,
    }]));

    // body
    cmds.push(text(cx, 300.0, 18.0, Anchor::Middle, vec![TextRun {
        text: CERTIFY_LINE.to_string(),
        fill: Color::GRAY_700,
        weight: Weight::Medium,
        underline: false,
    }]));
    cmds.push(text(cx, 362.0, 32.0, Anchor::Middle, vec![TextRun::bold(
        view.participant.text.clone(),
        Color::GRAY_900,
    )]));
    cmds.push(PaintCommand::Polyline {
        points: vec![(cx - 224.0, 382.0), (cx + 224.0, 382.0)],
        stroke: Color::BLUE_500,
        width: 3.0,
        opacity: 1.0,
    });

    let program = TextRun { underline: true, ..TextRun::bold(view.program.text.clone(), Color::BLUE_600) };
    let organization = TextRun::bold(view.organization.text.clone(), Color::BLUE_600);
    let one_line = format!(
        "has successfully participated in {}, organized by {}",
        view.program.text, view.organization.text
    );
    let mut y = 440.0;
    if estimate_width(&one_line, 18.0) <= w - 192.0 {
        cmds.push(text(cx, y, 18.0, Anchor::Middle, vec![
            TextRun::plain("has successfully participated in ", Color::GRAY_700),
            program,
            TextRun::plain(", organized by ", Color::GRAY_700),
            organization,
        ]));
        y += 40.0;
    } else {
        cmds.push(text(cx, y, 18.0, Anchor::Middle, vec![
            TextRun::plain("has successfully participated in ", Color::GRAY_700),
            program,
            TextRun::plain(",", Color::GRAY_700),
        ]));
        y += 28.0;
        cmds.push(text(cx, y, 18.0, Anchor::Middle, vec![
            TextRun::plain("organized by ", Color::GRAY_700),
            organization,
        ]));
        y += 40.0;
    }
    for line in wrap_text(COMMENDATION, 15.0, 640.0) {
        cmds.push(PaintCommand::Text {
            x: cx,
            y,
            size: 15.0,
            anchor: Anchor::Middle,
            italic: true,
            runs: vec![TextRun::plain(line, Color::GRAY_600)],
        });
        y += 22.0;
    }

    // footer
    let label = |s: &str| TextRun::bold(s, Color::GRAY_500);
    let value = |s: &str| TextRun { weight: Weight::Medium, ..TextRun::plain(s, Color::GRAY_800) };
    cmds.push(text(72.0, h - 96.0, 12.0, Anchor::Start, vec![label("DATE")]));
    cmds.push(text(72.0, h - 70.0, 18.0, Anchor::Start, vec![value(&view.date.text)]));
    cmds.push(text(w - 72.0, h - 96.0, 12.0, Anchor::End, vec![label("INITIATIVE")]));
    cmds.push(text(w - 72.0, h - 70.0, 18.0, Anchor::End, vec![value(&view.initiative.text)]));

    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::DateStyle;
    use crate::CertificateRecord;

    fn texts(cmds: &[PaintCommand]) -> Vec<String> {
        cmds.iter()
            .filter_map(|c| match c {
                PaintCommand::Text { runs, .. } => {
                    Some(runs.iter().map(|r| r.text.as_str()).collect::<String>())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn wrap_text_respects_width() {
        let lines = wrap_text("one two three four five six", 10.0, 60.0);
        assert!(lines.len() > 1);
        for l in &lines {
            assert!(estimate_width(l, 10.0) <= 60.0 || !l.contains(' '));
        }
    }

    #[test]
    fn layout_places_every_slot() {
        let rec = CertificateRecord::sample(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let view = CertificateView::from_record(&rec, DateStyle::Long, Some("Google"));
        let cmds = layout_certificate(&view, Canvas::default());
        let all = texts(&cmds);
        assert!(all.contains(&"Google".to_string()));
        assert!(all.contains(&"Certificate of Participation".to_string()));
        assert!(all.contains(&"John Doe".to_string()));
        assert!(all.contains(&"May 1, 2024".to_string()));
        assert!(all.iter().any(|t| t.contains("Student Ambassador Program")));
    }

    #[test]
    fn long_names_split_participation_line() {
        let long = "A".repeat(60);
        let rec = CertificateRecord::default()
            .with_field(crate::Field::ProgramName, long.as_str())
            .with_field(crate::Field::OrganizationName, long.as_str());
        let view = CertificateView::from_record(&rec, DateStyle::Long, None);
        let all = texts(&layout_certificate(&view, Canvas::default()));
        assert!(all.iter().any(|t| t.starts_with("organized by ")));
    }
}
