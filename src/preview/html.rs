/// HTML rendition of the certificate (print input)

use quick_xml::escape::escape;

use super::layout::Canvas;
use super::paint::Color;
use super::svg::FONT_FAMILY;
use super::view::{CertificateView, Slot, CERTIFY_LINE, COMMENDATION};

const WORDMARK_COLORS: [Color; 6] = [
    Color::BLUE_500,
    Color::RED_500,
    Color::YELLOW_500,
    Color::BLUE_500,
    Color::GREEN_500,
    Color::RED_500,
];

fn slot(s: &Slot, class: &str) -> String {
    let class = if s.placeholder {
        format!("{} placeholder", class)
    } else {
        class.to_string()
    };
    format!(r#"<span class="{}">{}</span>"#, class, escape(s.text.as_str()))
}

fn wordmark(mark: &str) -> String {
    mark.chars()
        .enumerate()
        .map(|(i, c)| {
            format!(
                r#"<span style="color:{}">{}</span>"#,
                WORDMARK_COLORS[i % WORDMARK_COLORS.len()].hex(),
                escape(c.to_string().as_str())
            )
        })
        .collect()
}

/// Render the `#certificate` element
pub fn to_html(view: &CertificateView, canvas: Canvas) -> String {
    let mut out = format!(
        r#"<div id="certificate" style="position:relative;box-sizing:border-box;width:{}px;height:{}px;background:#ffffff;border:2px solid {};border-radius:8px;padding:48px;display:flex;flex-direction:column;justify-content:center;text-align:center;font-family:{}">"#,
        canvas.width,
        canvas.height,
        Color::GRAY_200.hex(),
        escape(FONT_FAMILY),
    );
    if let Some(mark) = view.wordmark.as_deref() {
        out.push_str(&format!(
            r#"<div class="wordmark" style="font-size:40px;font-weight:700;margin-bottom:24px">{}</div>"#,
            wordmark(mark)
        ));
    }
    out.push_str(&format!(
        r#"<div class="heading" style="display:inline-block;align-self:center;background:linear-gradient(90deg,{},#8b5cf6,{});color:#ffffff;padding:14px 32px;border-radius:9999px;font-size:22px;font-weight:600">Certificate of {}</div>"#,
        Color::BLUE_500.hex(),
        Color::BLUE_600.hex(),
        slot(&view.certificate_type, "certificate-type"),
    ));
    out.push_str(&format!(
        r#"<p style="margin-top:48px;font-size:18px;color:{}">{}</p>"#,
        Color::GRAY_700.hex(),
        CERTIFY_LINE
    ));
    out.push_str(&format!(
        r#"<p class="participant-line" style="font-size:32px;font-weight:700;color:{};border-bottom:3px solid {};max-width:448px;margin:8px auto 32px;padding-bottom:12px">{}</p>"#,
        Color::GRAY_900.hex(),
        Color::BLUE_500.hex(),
        slot(&view.participant, "participant"),
    ));
    out.push_str(&format!(
        r#"<p style="font-size:18px;color:{gray}">has successfully participated in <b style="color:{blue};text-decoration:underline">{}</b>, organized by <b style="color:{blue}">{}</b></p>"#,
        slot(&view.program, "program"),
        slot(&view.organization, "organization"),
        gray = Color::GRAY_700.hex(),
        blue = Color::BLUE_600.hex(),
    ));
    out.push_str(&format!(
        r#"<p style="font-size:15px;font-style:italic;color:{}">{}</p>"#,
        Color::GRAY_600.hex(),
        COMMENDATION
    ));
    out.push_str(&format!(
        r#"<div style="display:flex;justify-content:space-between;align-items:flex-end;margin-top:auto;text-align:left"><div><p style="font-size:12px;font-weight:600;color:{label}">DATE</p><p style="font-size:18px;color:{value}">{}</p></div><div style="text-align:right"><p style="font-size:12px;font-weight:600;color:{label}">INITIATIVE</p><p style="font-size:18px;color:{value}">{}</p></div></div>"#,
        slot(&view.date, "date"),
        slot(&view.initiative, "initiative"),
        label = Color::GRAY_500.hex(),
        value = Color::GRAY_800.hex(),
    ));
    out.push_str("</div>");
    out
}
