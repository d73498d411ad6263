pub mod extract;
pub mod lines;
pub mod validate;

use serde::Deserialize;

use extract::BlockExtraction;
use lines::Lines;

/// One posting card as handed over by the rendering side.
///
/// Either the raw `text` of the card or its already split `lines` may be
/// given; when both are present the lines win.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub lines: Vec<String>,
    /// Hyperlinks inside the card, in document order.
    #[serde(default, alias = "hrefs")]
    pub links: Vec<String>,
    /// Text of the element the page marks as the education requirement.
    #[serde(default)]
    pub degree_hint: Option<String>,
}

impl TextBlock {
    pub fn to_lines(&self) -> Lines {
        if self.lines.is_empty() {
            Lines::from_raw(&self.text)
        } else {
            Lines::new(&self.lines)
        }
    }
}

/// Lines → field extractors → raw record (empty on fault).
pub fn extract_block(block: &TextBlock) -> BlockExtraction {
    let mut lines = block.to_lines();
    extract::extract_all(&mut lines, &block.links, block.degree_hint.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Vec<TextBlock> {
        let json = std::fs::read_to_string("tests/fixtures/blocks.json").unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn text_and_lines_forms_agree() {
        let from_text = TextBlock {
            text: "  算法工程师 \n\n上海\n".into(),
            ..Default::default()
        };
        let from_lines = TextBlock {
            lines: vec!["算法工程师".into(), "上海".into()],
            ..Default::default()
        };
        assert_eq!(extract_block(&from_text).record, extract_block(&from_lines).record);
    }

    #[test]
    fn fixture_cards() {
        let blocks = blocks();
        let records: Vec<_> = blocks.iter().map(|b| extract_block(b).record).collect();

        assert_eq!(records[0].title, "后端开发工程师");
        assert_eq!(records[0].company, "深圳市韶音科技有限");
        assert_eq!(records[0].degree, "硕士");
        assert_eq!(records[0].external_id, "410001");

        assert_eq!(records[1].title, "产品经理实习生");
        assert_eq!(records[1].salary, "200-300元/天");
        assert_eq!(records[1].weekly_days, "4");
        assert_eq!(records[1].internship_duration, "≥3个月");

        assert!(records[2].is_empty());
    }
}
