//! 内容種別ごとの正規表現ファミリーと既定辞書。
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::ContentType;

/// フォールバック `mention` の静的スコア。
pub const MENTION_SCORE: u32 = 1;

/// 名前付きのパターン束。パターンは大文字小文字を区別せずに照合する。
#[derive(Debug, Clone)]
pub struct ContentTypeFamily {
    label: ContentType,
    score: u32,
    min_length: Option<usize>,
    patterns: Vec<Regex>,
}

impl ContentTypeFamily {
    /// # Errors
    /// いずれかのパターンのコンパイルに失敗した場合は [`regex::Error`] を返す。
    pub fn new(
        label: ContentType,
        score: u32,
        min_length: Option<usize>,
        patterns: &[&str],
    ) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|pattern| RegexBuilder::new(pattern).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            label,
            score,
            min_length,
            patterns,
        })
    }

    #[must_use]
    pub fn label(&self) -> ContentType {
        self.label
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    #[must_use]
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }
}

struct FamilySpec {
    label: ContentType,
    score: u32,
    min_length: Option<usize>,
    patterns: &'static [&'static str],
}

const FAMILY_SPECS: &[FamilySpec] = &[
    // 批評: 評価語、上映時間、撮影・演出への言及
    FamilySpec {
        label: ContentType::Review,
        score: 10,
        min_length: Some(200),
        patterns: &[
            r"\breview(?:ed|s)?\b",
            r"\b(?:excellent|superb|mediocre|disappointing|tedious|splendid)\b",
            r"\b(?:story|plot)\b.{0,40}\b(?:weak|strong|thin|familiar|novel)\b",
            r"\bcast\b.{0,30}\b(?:includes|headed by|features)\b",
            r"\brunning time\b|\b\d+\s*min(?:s|utes)?\b",
            r"\b(?:estimate|verdict)\b",
            r"\b(?:photography|camera work|direction)\b",
            r"\bentertainment value\b",
        ],
    },
    FamilySpec {
        label: ContentType::BoxOffice,
        score: 9,
        min_length: None,
        patterns: &[
            r"\bbox[\s-]*office\b",
            r"\bgross(?:ed|es)?\s*\$[\d,]+",
            r"\bhouse record\b",
            r"\$[\d,]{3,}\s+(?:this|last|first|second)\s+week\b",
            r"\b(?:holdover|held over|holds over)\b",
            r"\b(?:receipts|takings|grosses)\b",
            r"\b(?:big|good|fair|poor|weak|mild|strong)\s+(?:business|biz)\b",
            r"\b\d+\s*(?:%|per cent)\s+(?:of|above|below)\s+(?:average|normal|par)\b",
        ],
    },
    FamilySpec {
        label: ContentType::Interview,
        score: 8,
        min_length: Some(100),
        patterns: &[
            r"\binterview(?:ed|s)?\b",
            r"\b(?:said|says|told|declared|stated)\b",
            r"\bin an? (?:chat|talk|conversation)\b",
            r"\b(?:asked|replied|answered)\b",
            r#""[^"]{20,}""#,
            r"\bexplain(?:s|ed)?\b",
        ],
    },
    FamilySpec {
        label: ContentType::ProductionNews,
        score: 7,
        min_length: None,
        patterns: &[
            r"\b(?:started|starts|begins|began)\s+(?:production|shooting|filming)\b",
            r"\b(?:shooting|filming)\s+(?:starts|begins|started|began|schedule)\b",
            r"\b(?:signed|engaged|cast)\s+(?:for|to play|as)\b",
            r"\bon location\b",
            r"\b(?:completed|finished|wound up|winds up)\b",
            r"\bnext (?:picture|production|film)\b",
            r"\b(?:in preparation|preparing|scheduled for release)\b",
        ],
    },
    FamilySpec {
        label: ContentType::Awards,
        score: 7,
        min_length: None,
        patterns: &[
            r"\bacademy awards?\b|\boscars?\b",
            r"\bawards?\b|\bawarded\b",
            r"\bnominat(?:ed|ion|ions)\b",
            r"\b(?:winner|won)\b",
            r"\bhonou?r(?:s|ed)?\b",
            r"\bten best\b|\bbest pictures? of the year\b",
            r"\b(?:plaque|medal|citation)\b",
        ],
    },
    FamilySpec {
        label: ContentType::ProductionPhoto,
        score: 6,
        min_length: None,
        patterns: &[
            r"\b(?:scene|still) from\b",
            r"\bphoto(?:graph)?(?:ed)? by\b",
            r"\bpictured\s+(?:above|below|here|left|right)\b",
            r"\b(?:above|below|left|right)\b.{0,20}\b(?:shown|seen)\b",
            r"\bon the set\b",
            r"\bleft to right\b|\bl\.\s*to\s*r\.",
        ],
    },
    FamilySpec {
        label: ContentType::Advertisement,
        score: 5,
        min_length: None,
        patterns: &[
            r"\bnow (?:playing|showing)\b",
            r"\bcoming (?:soon|attraction)\b",
            r"\b(?:book|booking|bookings) (?:it|this|now)\b",
            r"\bdon'?t miss\b",
            r"\bgreatest\b.{0,30}\b(?:picture|hit|ever)\b",
            r"!{2,}",
            r"\b(?:presents|presented by)\b",
            r"\b(?:released (?:through|by)|distributed by)\b",
            r"\b(?:smash hit|money picture)\b",
        ],
    },
    FamilySpec {
        label: ContentType::TradeMention,
        score: 3,
        min_length: None,
        patterns: &[
            r"\bexhibitors?\b",
            r"\bdistribut(?:or|ors|ion)\b",
            r"\brelease (?:date|schedule)\b",
            r"\bfeature\b",
            r"\bexchanges?\b",
            r"\bbooked\b",
            r"\bfirst[\s-]run\b",
            r"\bshowmen\b",
        ],
    },
];

/// コンパイル済みの既定ファミリー。表の順序がそのまま照合順になる。
pub static DEFAULT_FAMILIES: Lazy<Vec<ContentTypeFamily>> = Lazy::new(|| {
    FAMILY_SPECS
        .iter()
        .map(|spec| {
            ContentTypeFamily::new(spec.label, spec.score, spec.min_length, spec.patterns)
                .expect("built-in content-type patterns compile")
        })
        .collect()
});
