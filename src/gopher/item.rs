use std::fmt;
use std::path::Path;

/// Gopher item types.
///
/// The single character that leads every menu line and tells the client
/// what kind of resource the line points at. Covers the RFC 1436 set plus
/// the widely used `h`, `i`, `s` and `d` extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// 0 - Text file
    File,
    /// 1 - Directory (menu)
    Directory,
    /// 2 - CSO phone-book server
    CsoServer,
    /// 3 - Error
    Error,
    /// 4 - BinHexed Macintosh file
    BinHex,
    /// 5 - DOS binary archive
    DosBinary,
    /// 6 - UNIX uuencoded file
    Uuencoded,
    /// 7 - Index-search server
    Search,
    /// 8 - Telnet session
    Telnet,
    /// 9 - Binary file
    Binary,
    /// + - Redundant server
    Mirror,
    /// T - Telnet 3270 session
    Tn3270,
    /// g - GIF image
    Gif,
    /// I - Other image
    Image,
    /// h - HTML document
    Html,
    /// i - Informational text
    Info,
    /// s - Sound
    Sound,
    /// d - Document
    Document,
}

impl ItemType {
    /// Parses an item type from its type character.
    ///
    /// # Example
    ///
    /// ```
    /// # use gopherd::gopher::item::ItemType;
    /// assert_eq!(ItemType::from_char('1'), Some(ItemType::Directory));
    /// assert_eq!(ItemType::from_char('x'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(ItemType::File),
            '1' => Some(ItemType::Directory),
            '2' => Some(ItemType::CsoServer),
            '3' => Some(ItemType::Error),
            '4' => Some(ItemType::BinHex),
            '5' => Some(ItemType::DosBinary),
            '6' => Some(ItemType::Uuencoded),
            '7' => Some(ItemType::Search),
            '8' => Some(ItemType::Telnet),
            '9' => Some(ItemType::Binary),
            '+' => Some(ItemType::Mirror),
            'T' => Some(ItemType::Tn3270),
            'g' => Some(ItemType::Gif),
            'I' => Some(ItemType::Image),
            'h' => Some(ItemType::Html),
            'i' => Some(ItemType::Info),
            's' => Some(ItemType::Sound),
            'd' => Some(ItemType::Document),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            ItemType::File => '0',
            ItemType::Directory => '1',
            ItemType::CsoServer => '2',
            ItemType::Error => '3',
            ItemType::BinHex => '4',
            ItemType::DosBinary => '5',
            ItemType::Uuencoded => '6',
            ItemType::Search => '7',
            ItemType::Telnet => '8',
            ItemType::Binary => '9',
            ItemType::Mirror => '+',
            ItemType::Tn3270 => 'T',
            ItemType::Gif => 'g',
            ItemType::Image => 'I',
            ItemType::Html => 'h',
            ItemType::Info => 'i',
            ItemType::Sound => 's',
            ItemType::Document => 'd',
        }
    }

    /// Item type for a regular file in an auto-generated listing.
    ///
    /// Files without an extension, or with one of [`TEXT_EXTENSIONS`]
    /// (case-insensitive), are text (`0`). Everything else is binary (`9`).
    pub fn for_file(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            None => ItemType::File,
            Some(ext) if is_text_extension(ext) => ItemType::File,
            Some(_) => ItemType::Binary,
        }
    }
}

/// Extensions listed as text files.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "gmi", "csv", "log", "conf", "cfg", "ini", "json", "yaml", "yml", "toml", "xml",
    "rs", "c", "h", "py", "sh", "go", "js", "css", "html", "htm", "rst", "tex", "diff", "patch",
];

fn is_text_extension(ext: &str) -> bool {
    TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(ext))
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One menu record: `<type><display>TAB<selector>TAB<host>TAB<port>CRLF`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLine {
    pub item_type: ItemType,
    pub display: String,
    pub selector: String,
    pub host: String,
    pub port: String,
}

impl MenuLine {
    pub fn new(
        item_type: ItemType,
        display: impl Into<String>,
        selector: impl Into<String>,
        host: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            item_type,
            display: display.into(),
            selector: selector.into(),
            host: host.into(),
            port: port.into(),
        }
    }

    /// An informational line with empty selector, host and port.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(ItemType::Info, text, "", "", "")
    }

    /// An error line with empty selector, host and port.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ItemType::Error, message, "", "", "")
    }
}

impl fmt::Display for MenuLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}\t{}\t{}\t{}\r\n",
            self.item_type, self.display, self.selector, self.host, self.port
        )
    }
}
