//! Server-rendered main page.

use std::fmt::Write;

use crate::config::ServerConfig;
use crate::core::language::Language;
use crate::core::pipeline::{AudioOutcome, ImageOutcome, ImageResult};
use crate::core::session::SessionState;
use crate::core::upload::ACCEPTED_EXTENSIONS;

use super::audio::{escape_html, play_audio};

pub const PAGE_TITLE: &str = "🛍️ 商品標籤解讀器（含台語語音）";
pub const LANGUAGE_PROMPT: &str = "選擇語音語言";
pub const ADVANCED_LABEL: &str = "進階模式";
pub const UPLOAD_LABEL: &str = "上傳商品標籤圖片";
pub const PROCESS_LABEL: &str = "解讀標籤";
pub const RESET_LABEL: &str = "重新開始";
pub const SUMMARY_LABEL: &str = "總結：";

const STYLE: &str = "body{font-family:sans-serif;max-width:760px;margin:2rem auto;padding:0 1rem}\
.outcome{border-top:1px solid #ddd;padding:1rem 0}\
.outcome img{max-width:100%}\
.caption{color:#666;font-size:.9rem;text-align:center}\
.error{background:#fdecea;color:#8a1c1c;padding:.6rem;border-radius:4px}\
.info{background:#e8f1fb;color:#174a7c;padding:.6rem;border-radius:4px}\
form.controls>div{margin:.6rem 0}";

fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn render_controls(out: &mut String, state: &SessionState, config: &ServerConfig) {
    out.push_str("<form class=\"controls\" method=\"post\" action=\"/process\" enctype=\"multipart/form-data\">\n");

    let _ = writeln!(out, "<div><span>{LANGUAGE_PROMPT}</span>");
    for language in Language::ALL {
        let checked = if language == state.language {
            " checked"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "<label><input type=\"radio\" name=\"language\" value=\"{value}\"{checked}> {label}</label>",
            value = language.as_str(),
            label = language.label(),
        );
    }
    out.push_str("</div>\n");

    let checked = if state.advanced_mode { " checked" } else { "" };
    let _ = writeln!(
        out,
        "<div><label><input type=\"checkbox\" name=\"advanced\" value=\"on\"{checked}> {ADVANCED_LABEL}</label></div>"
    );

    let _ = writeln!(
        out,
        "<div><label>{UPLOAD_LABEL}<br><input type=\"file\" name=\"images\" accept=\"{accept}\" multiple></label> <small>(≤ {max})</small></div>",
        accept = accept_attribute(),
        max = config.max_images_per_upload,
    );

    let _ = writeln!(out, "<div><button type=\"submit\">{PROCESS_LABEL}</button></div>");
    out.push_str("</form>\n");

    let _ = writeln!(
        out,
        "<form method=\"post\" action=\"/reset\"><button type=\"submit\">{RESET_LABEL}</button></form>"
    );
}

/// One image's block: preview, summary, audio or its error, advanced note
pub fn render_outcome(outcome: &ImageOutcome) -> String {
    let mut out = String::from("<section class=\"outcome\">\n");

    match &outcome.result {
        ImageResult::Processed(report) => {
            let _ = writeln!(
                out,
                "<figure><img src=\"{src}\" alt=\"{alt}\"><figcaption class=\"caption\">{caption}</figcaption></figure>",
                src = escape_html(&report.preview),
                alt = escape_html(&outcome.filename),
                caption = escape_html(&outcome.caption()),
            );
            let _ = writeln!(
                out,
                "<p><strong>{SUMMARY_LABEL}</strong> {}</p>",
                escape_html(&report.summary)
            );
            match &report.audio {
                AudioOutcome::Ready(clip) => {
                    out.push_str(&play_audio(&clip.data, &outcome.audio_label()));
                }
                AudioOutcome::Failed { message } => {
                    let _ = writeln!(out, "<div class=\"error\">{}</div>", escape_html(message));
                }
            }
            if let Some(note) = report.advanced_note {
                let _ = writeln!(out, "<div class=\"info\">{}</div>", escape_html(note));
            }
        }
        ImageResult::Failed { message } => {
            let _ = writeln!(out, "<div class=\"error\">{}</div>", escape_html(message));
        }
    }

    out.push_str("</section>\n");
    out
}

/// Full HTML document for a session
pub fn render_page(state: &SessionState, config: &ServerConfig) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str("<!DOCTYPE html>\n<html lang=\"zh-Hant\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(out, "<title>{PAGE_TITLE}</title>");
    let _ = writeln!(out, "<style>{STYLE}</style>");
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{PAGE_TITLE}</h1>");

    render_controls(&mut out, state, config);

    for outcome in &state.outcomes {
        out.push_str(&render_outcome(outcome));
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::{ADVANCED_MODE_NOTE, ImageReport};
    use crate::core::tts::AudioClip;

    fn config() -> ServerConfig {
        ServerConfig::with_api_key("hf_test")
    }

    fn processed(index: usize, audio: AudioOutcome, note: bool) -> ImageOutcome {
        ImageOutcome {
            index,
            filename: format!("label-{index}.png"),
            result: ImageResult::Processed(ImageReport {
                preview: "data:image/png;base64,AAAA".to_string(),
                width: 4,
                height: 3,
                summary: "摘要 <b>".to_string(),
                audio,
                advanced_note: note.then_some(ADVANCED_MODE_NOTE),
            }),
        }
    }

    #[test]
    fn test_initial_page() {
        let html = render_page(&SessionState::default(), &config());
        assert!(html.contains(PAGE_TITLE));
        assert!(html.contains(LANGUAGE_PROMPT));
        assert!(html.contains(r#"value="chinese" checked"#));
        assert!(!html.contains(r#"value="taiwanese" checked"#));
        assert!(html.contains("中文"));
        assert!(html.contains("台語"));
        assert!(html.contains(ADVANCED_LABEL));
        assert!(html.contains(UPLOAD_LABEL));
        assert!(html.contains(r#"accept=".jpg,.jpeg,.png""#));
        assert!(html.contains(RESET_LABEL));
        assert!(!html.contains("class=\"outcome\""));
    }

    #[test]
    fn test_page_reflects_selection() {
        let state = SessionState {
            language: Language::Taiwanese,
            advanced_mode: true,
            ..Default::default()
        };
        let html = render_page(&state, &config());
        assert!(html.contains(r#"value="taiwanese" checked"#));
        assert!(html.contains(r#"name="advanced" value="on" checked"#));
    }

    #[test]
    fn test_processed_outcome_with_audio() {
        let clip = AudioClip::mp3(vec![1u8, 2, 3], Language::Chinese);
        let html = render_outcome(&processed(1, AudioOutcome::Ready(clip), false));
        assert!(html.contains("圖片 1"));
        assert!(html.contains("<strong>總結：</strong> 摘要 &lt;b&gt;"));
        assert!(html.contains("<h4>圖片 1 語音</h4>"));
        assert!(html.contains("data:audio/mp3;base64,AQID"));
        assert!(!html.contains(ADVANCED_MODE_NOTE));
    }

    #[test]
    fn test_processed_outcome_with_tts_error() {
        let audio = AudioOutcome::Failed {
            message: "語音合成失敗：boom".to_string(),
        };
        let html = render_outcome(&processed(2, audio, true));
        assert!(html.contains("語音合成失敗：boom"));
        assert!(!html.contains("<audio"));
        assert!(html.contains(ADVANCED_MODE_NOTE));
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = ImageOutcome {
            index: 2,
            filename: "bad.gif".to_string(),
            result: ImageResult::Failed {
                message: "處理圖片 2 時發生錯誤：unsupported".to_string(),
            },
        };
        let html = render_outcome(&outcome);
        assert!(html.contains("處理圖片 2 時發生錯誤"));
        assert!(!html.contains("<img"));
        assert!(!html.contains(SUMMARY_LABEL));
    }

    #[test]
    fn test_outcomes_render_in_order() {
        let state = SessionState {
            outcomes: vec![
                processed(
                    1,
                    AudioOutcome::Failed {
                        message: "x".to_string(),
                    },
                    false,
                ),
                processed(
                    2,
                    AudioOutcome::Failed {
                        message: "y".to_string(),
                    },
                    false,
                ),
            ],
            ..Default::default()
        };
        let html = render_page(&state, &config());
        let first = html.find("圖片 1").unwrap();
        let second = html.find("圖片 2").unwrap();
        assert!(first < second);
    }
}
