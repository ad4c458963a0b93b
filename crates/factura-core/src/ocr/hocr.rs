use crate::error::FacturaError;
use crate::model::PageGeometry;
use crate::ocr::tsv::geometry_from_extent;
use crate::ocr::{OcrPage, RawWord};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Default, Clone, PartialEq)]
struct TitleProps {
    bbox: Option<(i32, i32, i32, i32)>,
    confidence: Option<f32>,
    dpi: Option<u32>,
}

struct OpenWord {
    depth: usize,
    props: TitleProps,
    text: String,
}

struct OpenPage {
    geometry: Option<PageGeometry>,
    words: Vec<RawWord>,
}

/// Parse Tesseract hOCR (`tesseract img stdout hocr`) into pages.
///
/// Reads `ocr_page` elements for page geometry (and `scan_res` for DPI) and
/// `ocrx_word` elements for word boxes. Word text is the concatenation of all
/// text nodes nested in the word element.
pub fn parse_hocr(xhtml: &str) -> Result<Vec<OcrPage>, FacturaError> {
    let mut reader = Reader::from_str(xhtml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<OpenPage> = Vec::new();
    let mut word: Option<OpenWord> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                open_element(&e, depth, &mut pages, &mut word)?;
            }
            Ok(Event::Empty(e)) => {
                // Self-closing page or word elements carry no text.
                open_element(&e, depth + 1, &mut pages, &mut None)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(open) = word.as_mut() {
                    let text = match t.unescape() {
                        Ok(s) => s.into_owned(),
                        Err(_) => String::from_utf8_lossy(&t).into_owned(),
                    };
                    open.text.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                if word.as_ref().is_some_and(|w| w.depth == depth) {
                    if let (Some(open), Some(page)) = (word.take(), pages.last_mut()) {
                        if let Some(raw) = finish_word(open) {
                            page.words.push(raw);
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FacturaError::OcrParse(format!(
                    "invalid hOCR at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    if pages.is_empty() {
        return Err(FacturaError::OcrParse("no ocr_page elements found".into()));
    }

    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            let geometry = page
                .geometry
                .unwrap_or_else(|| geometry_from_extent(&page.words));
            OcrPage {
                page_number: i + 1,
                geometry,
                words: page.words,
            }
        })
        .collect())
}

fn open_element(
    e: &BytesStart<'_>,
    depth: usize,
    pages: &mut Vec<OpenPage>,
    word: &mut Option<OpenWord>,
) -> Result<(), FacturaError> {
    let Some(class) = attr_value(e, b"class")? else {
        return Ok(());
    };
    let title = attr_value(e, b"title")?.unwrap_or_default();

    if has_class(&class, "ocr_page") {
        let props = parse_title(&title);
        let geometry = props.bbox.and_then(|(x0, y0, x1, y1)| {
            let (w, h) = (x1 - x0, y1 - y0);
            (w > 0 && h > 0).then(|| PageGeometry {
                width: w as u32,
                height: h as u32,
                dpi: props.dpi,
            })
        });
        pages.push(OpenPage {
            geometry,
            words: Vec::new(),
        });
    } else if has_class(&class, "ocrx_word") {
        if pages.is_empty() {
            // Word outside any page element; treat the document as one page.
            pages.push(OpenPage {
                geometry: None,
                words: Vec::new(),
            });
        }
        *word = Some(OpenWord {
            depth,
            props: parse_title(&title),
            text: String::new(),
        });
    }

    Ok(())
}

fn finish_word(open: OpenWord) -> Option<RawWord> {
    let (x0, y0, x1, y1) = open.props.bbox?;
    Some(RawWord {
        text: open.text,
        left: x0,
        top: y0,
        width: x1 - x0,
        height: y1 - y0,
        confidence: open.props.confidence,
    })
}

fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, FacturaError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| FacturaError::OcrParse(format!("bad attribute: {err}")))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|err| FacturaError::OcrParse(format!("bad attribute value: {err}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn has_class(class: &str, wanted: &str) -> bool {
    class.split_whitespace().any(|c| c == wanted)
}

/// Parse an hOCR `title` property list like `bbox 36 92 96 116; x_wconf 90`.
fn parse_title(title: &str) -> TitleProps {
    let mut props = TitleProps::default();
    for part in title.split(';') {
        let mut tokens = part.split_whitespace();
        match tokens.next() {
            Some("bbox") => {
                let nums: Vec<i32> = tokens.filter_map(|t| t.parse().ok()).collect();
                if nums.len() == 4 {
                    props.bbox = Some((nums[0], nums[1], nums[2], nums[3]));
                }
            }
            Some("x_wconf") => {
                props.confidence = tokens.next().and_then(|t| t.parse().ok());
            }
            Some("scan_res") => {
                props.dpi = tokens.next().and_then(|t| t.parse().ok());
            }
            _ => {}
        }
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
 <body>
  <div class='ocr_page' id='page_1' title='image "p1.png"; bbox 0 0 2480 3508; ppageno 0; scan_res 300 300'>
   <div class='ocr_carea' id='block_1_1' title="bbox 100 600 900 640">
    <span class='ocr_line' id='line_1_1' title="bbox 100 600 900 640">
     <span class='ocrx_word' id='word_1_1' title='bbox 100 600 160 640; x_wconf 96'>234</span>
     <span class='ocrx_word' id='word_1_2' title='bbox 400 600 560 640; x_wconf 91'><strong>Widget</strong></span>
     <span class='ocrx_word' id='word_1_3' title='bbox 600 600 700 640; x_wconf 88'>A&amp;B</span>
    </span>
   </div>
  </div>
 </body>
</html>"#;

    #[test]
    fn test_parse_words_and_geometry() {
        let pages = parse_hocr(SAMPLE).unwrap();
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert_eq!(page.page_number, 1);
        assert_eq!(page.geometry, PageGeometry::new(2480, 3508).with_dpi(300));
        assert_eq!(page.words.len(), 3);
        assert_eq!(page.words[0].text, "234");
        assert_eq!(page.words[0].left, 100);
        assert_eq!(page.words[0].top, 600);
        assert_eq!(page.words[0].width, 60);
        assert_eq!(page.words[0].height, 40);
        assert_eq!(page.words[0].confidence, Some(96.0));
    }

    #[test]
    fn test_nested_text_and_entities() {
        let pages = parse_hocr(SAMPLE).unwrap();
        assert_eq!(pages[0].words[1].text, "Widget");
        assert_eq!(pages[0].words[2].text, "A&B");
    }

    #[test]
    fn test_parse_title() {
        let props = parse_title("bbox 36 92 96 116; x_wconf 90");
        assert_eq!(props.bbox, Some((36, 92, 96, 116)));
        assert_eq!(props.confidence, Some(90.0));
        assert_eq!(props.dpi, None);
    }

    #[test]
    fn test_two_pages() {
        let xhtml = r#"<html><body>
<div class='ocr_page' title='bbox 0 0 1000 1000'><span class='ocrx_word' title='bbox 1 1 5 5; x_wconf 90'>a</span></div>
<div class='ocr_page' title='bbox 0 0 1000 1400'><span class='ocrx_word' title='bbox 1 1 5 5; x_wconf 90'>b</span></div>
</body></html>"#;
        let pages = parse_hocr(xhtml).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].geometry.height, 1400);
        assert_eq!(pages[1].words[0].text, "b");
    }

    #[test]
    fn test_no_pages_is_error() {
        assert!(parse_hocr("<html><body><p>hi</p></body></html>").is_err());
    }
}
