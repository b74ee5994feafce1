/// Code unit that ends a line
pub const TERMINATOR: u16 = 0xFFFF;
/// Code unit that opens an inline command
pub const COMMAND_HEADER: u16 = 0xF000;

/// Sentinel code units rendered as a literal glyph
pub const SPECIAL_CHARACTERS: &[(u16, char)] = &[
    (0x246D, '♂'),
    (0x246E, '♀'),
    (0xFFFE, '\n'),
];

/// Command opcodes and their mnemonics. Mnemonics are unique.
pub const COMMANDS: &[(u16, &str)] = &[
    (0x0100, "TRNAME"),
    (0x0101, "PKNAME"),
    (0x0102, "PKNICK"),
    (0x0103, "TYPE"),
    (0x0105, "LOCATION"),
    (0x0106, "ABILITY"),
    (0x0107, "MOVE"),
    (0x0108, "ITEM1"),
    (0x0109, "ITEM2"),
    (0x010A, "DRESSUPPROP"),
    (0x010B, "BOX"),
    (0x010C, "BATTLEPK"),
    (0x010D, "STAT"),
    (0x010E, "TRCLASS"),
    (0x010F, "HOBBY"),
    (0x0110, "PASSPOWER"),
    (0x0112, "BAGPOCKET"),
    (0x0113, "SURVEYRESULT"),
    (0x011C, "GENERIC"),
    (0x0122, "DRESSUPSHOWNAME"),
    (0x0123, "DRESSUPSHOWFEELING"),
    (0x0124, "COUNTRY"),
    (0x0125, "PROVINCE"),
    (0x0131, "DRESSUPBODYPART"),
    (0x0132, "DECORNAME"),
    (0x0133, "DRESSUPAUDIENCE"),
    (0x0134, "MIINAME"),
    (0x0135, "MEDAL"),
    (0x0136, "MEDALISTRANK"),
    (0x0137, "JOINAVINPUT"),
    (0x013B, "TOURNAMENT"),
    (0x013C, "BATTLEMODE"),
    (0x013D, "INSTTITLE"),
    (0x013E, "WEATHER"),
    (0x013F, "MOVIENAME"),
    (0x0140, "FUNFESTMISSION"),
    (0x0142, "JOINAVRANK"),
    (0x0143, "ENTRALINKLVL"),
    (0x0189, "TRNICK"),
    (0x018A, "1stchrTR"),
    (0x018B, "SHOUTOUT"),
    (0x018E, "BERRY"),
    (0x018F, "REMFEEL"),
    (0x0190, "REMQUAL"),
    (0x0191, "WEBSITE"),
    (0x0192, "PRVIDSAY"),
    (0x0193, "BTLTEST"),
    (0x0195, "GENLOC"),
    (0x0199, "CHOICEFOOD"),
    (0x019A, "HOTELITEM"),
    (0x019B, "TAXISTOP"),
    (0x019C, "CHOICECOS"),
    (0x019F, "MAISTITLE"),
    (0x01A1, "GSYNCID"),
    (0x0200, "NUM1"),
    (0x0201, "NUM2"),
    (0x0202, "NUM3"),
    (0x0203, "NUM4"),
    (0x0204, "NUM5"),
    (0x0205, "NUM6"),
    (0x0206, "NUM7"),
    (0x0207, "NUM8"),
    (0x0208, "NUM9"),
    (0x1000, "ITEMPLUR0"),
    (0x1001, "ITEMPLUR1"),
    (0x1100, "GENDBR"),
    (0x1101, "NUMBRNCH"),
    (0x1302, "iCOLOR2"),
    (0x1303, "iCOLOR3"),
    (0xBD00, "COLOREX"),
    (0xBD01, "COLORRESET"),
    (0xBD02, "CENTER"),
    (0xBD03, "RIGHT"),
    (0xBD04, "SKIPPIXELS"),
    (0xBD05, "SETXPOS"),
    (0xBDFF, "BLANK"),
    (0xBE00, "SCROLL"),
    (0xBE01, "CLEAR"),
    (0xBE02, "WAIT"),
    (0xBE09, "SPEED"),
    (0xFF00, "COLOR"),
];

/// Glyph shown for a sentinel code unit
pub fn glyph_for(unit: u16) -> Option<char> {
    SPECIAL_CHARACTERS
        .iter()
        .find(|(sentinel, _)| *sentinel == unit)
        .map(|(_, glyph)| *glyph)
}

/// Sentinel code unit written for a glyph
pub fn sentinel_for(glyph: char) -> Option<u16> {
    SPECIAL_CHARACTERS
        .iter()
        .find(|(_, candidate)| *candidate == glyph)
        .map(|(sentinel, _)| *sentinel)
}

/// Mnemonic of a command opcode
pub fn mnemonic_for(opcode: u16) -> Option<&'static str> {
    COMMANDS
        .iter()
        .find(|(candidate, _)| *candidate == opcode)
        .map(|(_, name)| *name)
}

/// Opcode of a command mnemonic (exact, case-sensitive match)
pub fn opcode_for(mnemonic: &str) -> Option<u16> {
    COMMANDS
        .iter()
        .find(|(_, name)| *name == mnemonic)
        .map(|(opcode, _)| *opcode)
}
