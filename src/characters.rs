// ============================================
// src/characters.rs
// かな文字データ (ひらがな / カタカナ) と検索
// ============================================

use std::fmt;

/// 1文字ぶんのデータ
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CharacterRecord {
    pub glyph: &'static str,     // 表示用 (かな)
    pub romanized: &'static str, // 答え (ローマ字)
    pub mnemonic: &'static str,  // 覚え方
}

/// 文字の種類
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Script {
    #[default]
    Hiragana,
    Katakana,
}

impl Script {
    pub const ALL: [Script; 2] = [Script::Hiragana, Script::Katakana];

    /// この文字種の一覧 (五十音順)
    pub fn characters(self) -> &'static [CharacterRecord] {
        match self {
            Script::Hiragana => HIRAGANA,
            Script::Katakana => KATAKANA,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Script::Hiragana => "Hiragana",
            Script::Katakana => "Katakana",
        }
    }

    /// ローマ字から検索 (最初に見つかったもの)
    pub fn by_romanized(self, romanized: &str) -> Option<&'static CharacterRecord> {
        self.characters().iter().find(|c| c.romanized == romanized)
    }

    /// 文字そのものから検索
    pub fn by_glyph(self, glyph: &str) -> Option<&'static CharacterRecord> {
        self.characters().iter().find(|c| c.glyph == glyph)
    }

    /// その文字がこの文字種に含まれるか
    pub fn contains(self, glyph: &str) -> bool {
        self.by_glyph(glyph).is_some()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ひらがな一覧
pub const HIRAGANA: &[CharacterRecord] = &[
    // あ行
    CharacterRecord { glyph: "あ", romanized: "a", mnemonic: "A temple gate" },
    CharacterRecord { glyph: "い", romanized: "i", mnemonic: "An eel swimming" },
    CharacterRecord { glyph: "う", romanized: "u", mnemonic: "An upside-down hook" },
    CharacterRecord { glyph: "え", romanized: "e", mnemonic: "Elephant trunk" },
    CharacterRecord { glyph: "お", romanized: "o", mnemonic: "Octopus tentacles" },

    // か行
    CharacterRecord { glyph: "か", romanized: "ka", mnemonic: "Katana blade" },
    CharacterRecord { glyph: "き", romanized: "ki", mnemonic: "Key shape" },
    CharacterRecord { glyph: "く", romanized: "ku", mnemonic: "Cuckoo bird beak" },
    CharacterRecord { glyph: "け", romanized: "ke", mnemonic: "Keg barrel" },
    CharacterRecord { glyph: "こ", romanized: "ko", mnemonic: "Coin shape" },

    // さ行
    CharacterRecord { glyph: "さ", romanized: "sa", mnemonic: "Samurai sword" },
    CharacterRecord { glyph: "し", romanized: "shi", mnemonic: "Fishing hook" },
    CharacterRecord { glyph: "す", romanized: "su", mnemonic: "Swing set" },
    CharacterRecord { glyph: "せ", romanized: "se", mnemonic: "Seven with a line" },
    CharacterRecord { glyph: "そ", romanized: "so", mnemonic: "Sewing needle" },

    // た行
    CharacterRecord { glyph: "た", romanized: "ta", mnemonic: "Table with legs" },
    CharacterRecord { glyph: "ち", romanized: "chi", mnemonic: "Cheerleader" },
    CharacterRecord { glyph: "つ", romanized: "tsu", mnemonic: "Tsunami wave" },
    CharacterRecord { glyph: "て", romanized: "te", mnemonic: "Telephone pole" },
    CharacterRecord { glyph: "と", romanized: "to", mnemonic: "Toothpick" },

    // な行
    CharacterRecord { glyph: "な", romanized: "na", mnemonic: "Naughty cross" },
    CharacterRecord { glyph: "に", romanized: "ni", mnemonic: "Needle and thread" },
    CharacterRecord { glyph: "ぬ", romanized: "nu", mnemonic: "Noodle slurp" },
    CharacterRecord { glyph: "ね", romanized: "ne", mnemonic: "Nail bent" },
    CharacterRecord { glyph: "の", romanized: "no", mnemonic: "No symbol" },

    // は行
    CharacterRecord { glyph: "は", romanized: "ha", mnemonic: "Hahaha face" },
    CharacterRecord { glyph: "ひ", romanized: "hi", mnemonic: "He is tall" },
    CharacterRecord { glyph: "ふ", romanized: "fu", mnemonic: "Futon bed" },
    CharacterRecord { glyph: "へ", romanized: "he", mnemonic: "Heaven above" },
    CharacterRecord { glyph: "ほ", romanized: "ho", mnemonic: "House with chimney" },

    // ま行
    CharacterRecord { glyph: "ま", romanized: "ma", mnemonic: "Mama hugging" },
    CharacterRecord { glyph: "み", romanized: "mi", mnemonic: "Me pointing" },
    CharacterRecord { glyph: "む", romanized: "mu", mnemonic: "Moo cow face" },
    CharacterRecord { glyph: "め", romanized: "me", mnemonic: "Messy hair" },
    CharacterRecord { glyph: "も", romanized: "mo", mnemonic: "More curvy lines" },

    // や行
    CharacterRecord { glyph: "や", romanized: "ya", mnemonic: "Yacht sailing" },
    CharacterRecord { glyph: "ゆ", romanized: "yu", mnemonic: "You fishing" },
    CharacterRecord { glyph: "よ", romanized: "yo", mnemonic: "Yo-yo string" },

    // ら行
    CharacterRecord { glyph: "ら", romanized: "ra", mnemonic: "Rabbit ears" },
    CharacterRecord { glyph: "り", romanized: "ri", mnemonic: "River flowing" },
    CharacterRecord { glyph: "る", romanized: "ru", mnemonic: "Roof curving" },
    CharacterRecord { glyph: "れ", romanized: "re", mnemonic: "Red pepper" },
    CharacterRecord { glyph: "ろ", romanized: "ro", mnemonic: "Robot square" },

    // わ行 + ん
    CharacterRecord { glyph: "わ", romanized: "wa", mnemonic: "Waffle pattern" },
    CharacterRecord { glyph: "を", romanized: "wo", mnemonic: "Wow exclamation" },
    CharacterRecord { glyph: "ん", romanized: "n", mnemonic: "Nap curled up" },
];

/// カタカナ一覧
pub const KATAKANA: &[CharacterRecord] = &[
    // ア行
    CharacterRecord { glyph: "ア", romanized: "a", mnemonic: "Axe chopping" },
    CharacterRecord { glyph: "イ", romanized: "i", mnemonic: "Eagle beak" },
    CharacterRecord { glyph: "ウ", romanized: "u", mnemonic: "Unicorn horn" },
    CharacterRecord { glyph: "エ", romanized: "e", mnemonic: "Elevator doors" },
    CharacterRecord { glyph: "オ", romanized: "o", mnemonic: "Opera singer" },

    // カ行
    CharacterRecord { glyph: "カ", romanized: "ka", mnemonic: "Cutting knife" },
    CharacterRecord { glyph: "キ", romanized: "ki", mnemonic: "Key with teeth" },
    CharacterRecord { glyph: "ク", romanized: "ku", mnemonic: "Claw mark" },
    CharacterRecord { glyph: "ケ", romanized: "ke", mnemonic: "Ketchup bottle" },
    CharacterRecord { glyph: "コ", romanized: "ko", mnemonic: "Corner angle" },

    // サ行
    CharacterRecord { glyph: "サ", romanized: "sa", mnemonic: "Sake cup" },
    CharacterRecord { glyph: "シ", romanized: "shi", mnemonic: "Sheep jumping" },
    CharacterRecord { glyph: "ス", romanized: "su", mnemonic: "Skiing down" },
    CharacterRecord { glyph: "セ", romanized: "se", mnemonic: "Say with mouth" },
    CharacterRecord { glyph: "ソ", romanized: "so", mnemonic: "Sewing zigzag" },

    // タ行
    CharacterRecord { glyph: "タ", romanized: "ta", mnemonic: "Taxi top sign" },
    CharacterRecord { glyph: "チ", romanized: "chi", mnemonic: "Cheese wedge" },
    CharacterRecord { glyph: "ツ", romanized: "tsu", mnemonic: "Tsunami with dots" },
    CharacterRecord { glyph: "テ", romanized: "te", mnemonic: "Television antenna" },
    CharacterRecord { glyph: "ト", romanized: "to", mnemonic: "Totem pole" },

    // ナ行
    CharacterRecord { glyph: "ナ", romanized: "na", mnemonic: "Knife cutting" },
    CharacterRecord { glyph: "ニ", romanized: "ni", mnemonic: "Needle through" },
    CharacterRecord { glyph: "ヌ", romanized: "nu", mnemonic: "Noodle twist" },
    CharacterRecord { glyph: "ネ", romanized: "ne", mnemonic: "Net for catching" },
    CharacterRecord { glyph: "ノ", romanized: "no", mnemonic: "Note diagonal" },

    // ハ行
    CharacterRecord { glyph: "ハ", romanized: "ha", mnemonic: "Hat brim" },
    CharacterRecord { glyph: "ヒ", romanized: "hi", mnemonic: "He is standing" },
    CharacterRecord { glyph: "フ", romanized: "fu", mnemonic: "Roof hook" },
    CharacterRecord { glyph: "ヘ", romanized: "he", mnemonic: "Mountain peak" },
    CharacterRecord { glyph: "ホ", romanized: "ho", mnemonic: "Holy cross" },

    // マ行
    CharacterRecord { glyph: "マ", romanized: "ma", mnemonic: "Mama bird mouth" },
    CharacterRecord { glyph: "ミ", romanized: "mi", mnemonic: "Missile trails" },
    CharacterRecord { glyph: "ム", romanized: "mu", mnemonic: "Moon crescent" },
    CharacterRecord { glyph: "メ", romanized: "me", mnemonic: "Medicine cross" },
    CharacterRecord { glyph: "モ", romanized: "mo", mnemonic: "More than sign" },

    // ヤ行
    CharacterRecord { glyph: "ヤ", romanized: "ya", mnemonic: "Yacht mast" },
    CharacterRecord { glyph: "ユ", romanized: "yu", mnemonic: "U-turn sign" },
    CharacterRecord { glyph: "ヨ", romanized: "yo", mnemonic: "Yo-yo on string" },

    // ラ行
    CharacterRecord { glyph: "ラ", romanized: "ra", mnemonic: "Rabbit running" },
    CharacterRecord { glyph: "リ", romanized: "ri", mnemonic: "River reeds" },
    CharacterRecord { glyph: "ル", romanized: "ru", mnemonic: "Route sign" },
    CharacterRecord { glyph: "レ", romanized: "re", mnemonic: "Red arrow" },
    CharacterRecord { glyph: "ロ", romanized: "ro", mnemonic: "Robot mouth" },

    // ワ行 + ン
    CharacterRecord { glyph: "ワ", romanized: "wa", mnemonic: "Wine glass" },
    CharacterRecord { glyph: "ヲ", romanized: "wo", mnemonic: "Woman dancing" },
    CharacterRecord { glyph: "ン", romanized: "n", mnemonic: "Nap sitting" },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn both_scripts_have_46_unique_glyphs() {
        for script in Script::ALL {
            let glyphs: HashSet<_> = script.characters().iter().map(|c| c.glyph).collect();
            assert_eq!(glyphs.len(), 46, "{script}");
        }
    }

    #[test]
    fn lookup_by_romanized_and_glyph() {
        let shi = Script::Hiragana.by_romanized("shi").unwrap();
        assert_eq!(shi.glyph, "し");
        assert_eq!(Script::Katakana.by_glyph("ツ").unwrap().romanized, "tsu");
        assert!(Script::Hiragana.by_glyph("ツ").is_none());
        assert!(Script::Katakana.by_romanized("xyz").is_none());
    }
}
