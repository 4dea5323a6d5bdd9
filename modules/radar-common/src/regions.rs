use serde::{Deserialize, Serialize};

/// The five coverage regions. Every tracked venue belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    North,
    Center,
    South,
    Sharon,
    Shfela,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::Center,
        Region::South,
        Region::Sharon,
        Region::Shfela,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "north",
            Region::Center => "center",
            Region::South => "south",
            Region::Sharon => "sharon",
            Region::Shfela => "shfela",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "north" => Some(Self::North),
            "center" => Some(Self::Center),
            "south" => Some(Self::South),
            "sharon" => Some(Self::Sharon),
            "shfela" => Some(Self::Shfela),
            _ => None,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// City-to-region coverage table. Hebrew spellings and transliterated
/// English ones are separate entries; everything is stored lowercase so
/// lookup can normalize once.
const CITY_TABLE: &[(&str, Region)] = &[
    // הצפון
    ("חיפה", Region::North),
    ("haifa", Region::North),
    ("קריות", Region::North),
    ("krayot", Region::North),
    ("קרית אתא", Region::North),
    ("קרית ביאליק", Region::North),
    ("קרית מוצקין", Region::North),
    ("קרית ים", Region::North),
    ("נצרת", Region::North),
    ("nazareth", Region::North),
    ("נוף הגליל", Region::North),
    ("עפולה", Region::North),
    ("afula", Region::North),
    ("טבריה", Region::North),
    ("tiberias", Region::North),
    ("צפת", Region::North),
    ("safed", Region::North),
    ("tzfat", Region::North),
    ("נהריה", Region::North),
    ("nahariya", Region::North),
    ("עכו", Region::North),
    ("acre", Region::North),
    ("akko", Region::North),
    ("כרמיאל", Region::North),
    ("karmiel", Region::North),
    ("קרית שמונה", Region::North),
    ("kiryat shmona", Region::North),
    ("בית שאן", Region::North),
    ("beit she'an", Region::North),
    ("עוספיא", Region::North),
    ("usfiya", Region::North),
    ("דלית אל כרמל", Region::North),
    ("דאלית אל כרמל", Region::North),
    ("daliyat al-karmel", Region::North),
    ("שפרעם", Region::North),
    ("שפר עמר", Region::North),
    ("shefa-'amr", Region::North),
    ("טמרה", Region::North),
    ("tamra", Region::North),
    ("סכנין", Region::North),
    ("sakhnin", Region::North),
    ("כפר יאסיף", Region::North),
    ("kfar yasif", Region::North),
    ("ירכא", Region::North),
    ("yarka", Region::North),
    ("פקיעין", Region::North),
    ("peki'in", Region::North),
    ("מג'דל שמס", Region::North),
    ("majd al-shams", Region::North),
    // מרכז
    ("תל אביב", Region::Center),
    ("תל אביב-יפו", Region::Center),
    ("tel aviv", Region::Center),
    ("tel aviv-yafo", Region::Center),
    ("tlv", Region::Center),
    ("רמת גן", Region::Center),
    ("ramat gan", Region::Center),
    ("גבעתיים", Region::Center),
    ("givatayim", Region::Center),
    ("חולון", Region::Center),
    ("holon", Region::Center),
    ("בת ים", Region::Center),
    ("bat yam", Region::Center),
    ("פתח תקווה", Region::Center),
    ("פתח תקוה", Region::Center),
    ("petah tikva", Region::Center),
    ("בני ברק", Region::Center),
    ("bnei brak", Region::Center),
    ("קרית אונו", Region::Center),
    ("kiryat ono", Region::Center),
    ("אור יהודה", Region::Center),
    ("or yehuda", Region::Center),
    ("ראש העין", Region::Center),
    ("rosh haayin", Region::Center),
    // השרון
    ("נתניה", Region::Sharon),
    ("netanya", Region::Sharon),
    ("הרצליה", Region::Sharon),
    ("herzliya", Region::Sharon),
    ("כפר סבא", Region::Sharon),
    ("kfar saba", Region::Sharon),
    ("רעננה", Region::Sharon),
    ("ra'anana", Region::Sharon),
    ("raanana", Region::Sharon),
    ("הוד השרון", Region::Sharon),
    ("hod hasharon", Region::Sharon),
    ("רמת השרון", Region::Sharon),
    ("ramat hasharon", Region::Sharon),
    ("טייבה", Region::Sharon),
    ("tayibe", Region::Sharon),
    ("טירה", Region::Sharon),
    ("tira", Region::Sharon),
    ("חדרה", Region::Sharon),
    ("hadera", Region::Sharon),
    ("כפר יונה", Region::Sharon),
    ("kfar yona", Region::Sharon),
    // השפלה
    ("ראשון לציון", Region::Shfela),
    ("rishon lezion", Region::Shfela),
    ("רחובות", Region::Shfela),
    ("rehovot", Region::Shfela),
    ("לוד", Region::Shfela),
    ("lod", Region::Shfela),
    ("רמלה", Region::Shfela),
    ("ramla", Region::Shfela),
    ("נס ציונה", Region::Shfela),
    ("ness ziona", Region::Shfela),
    ("יבנה", Region::Shfela),
    ("yavne", Region::Shfela),
    ("מודיעין", Region::Shfela),
    ("modi'in", Region::Shfela),
    ("מודיעין-מכבים-רעות", Region::Shfela),
    ("באר יעקב", Region::Shfela),
    ("beer yaakov", Region::Shfela),
    // הדרום
    // Ashdod sits on the shfela/south border; tracked as south.
    ("אשדוד", Region::South),
    ("ashdod", Region::South),
    ("אשקלון", Region::South),
    ("ashkelon", Region::South),
    ("באר שבע", Region::South),
    ("beer sheva", Region::South),
    ("be'er sheva", Region::South),
    ("אילת", Region::South),
    ("eilat", Region::South),
    ("נתיבות", Region::South),
    ("netivot", Region::South),
    ("שדרות", Region::South),
    ("sderot", Region::South),
    ("ערד", Region::South),
    ("arad", Region::South),
    ("קרית גת", Region::South),
    ("kiryat gat", Region::South),
    ("דימונה", Region::South),
    ("dimona", Region::South),
    ("אופקים", Region::South),
    ("ofakim", Region::South),
];

/// Map a free-text city name to its coverage region.
///
/// Lookup is exact after trimming and lowercasing. `None` means the city is
/// outside the coverage table — callers creating a venue fall back to
/// [`Region::Center`], but the fallback is theirs, not the classifier's.
pub fn classify(city: &str) -> Option<Region> {
    let normalized = city.trim().to_lowercase();
    CITY_TABLE
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, region)| *region)
}

/// Every city spelling in the coverage table, in table order. Used to
/// recognize city words embedded in free-text venue queries.
pub fn city_names() -> impl Iterator<Item = &'static str> {
    CITY_TABLE.iter().map(|(name, _)| *name)
}
