//! The standard emissions species table.
//!
//! Each entry either introduces a base species unit with its own
//! dimension tag, or derives a unit from an already-defined species with
//! a molecular-mass factor and optional extra aliases. Entry order
//! matters: derived entries may only reference species defined earlier in
//! the table.

/// Definition of one standard gas symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GasDef {
    /// Base unit introducing a new dimension tag; the tag name becomes an
    /// alias unit when it differs from the symbol.
    Base(&'static str),
    /// Derived unit: `factor * base`, plus aliases for the symbol.
    Derived {
        factor: f64,
        base: &'static str,
        aliases: &'static [&'static str],
    },
}

/// Shorthand for an alternative symbol of an existing species.
const fn alias_of(base: &'static str) -> GasDef {
    GasDef::Derived {
        factor: 1.0,
        base,
        aliases: &[],
    }
}

/// Standard gases, in definition order.
pub static STANDARD_GASES: &[(&str, GasDef)] = &[
    // CO2, CH4, N2O
    ("C", GasDef::Base("carbon")),
    (
        "CO2",
        GasDef::Derived {
            factor: 12.0 / 44.0,
            base: "C",
            aliases: &["carbon_dioxide"],
        },
    ),
    ("CH4", GasDef::Base("methane")),
    ("HC50", alias_of("CH4")),
    ("N2O", GasDef::Base("nitrous_oxide")),
    (
        "N2ON",
        GasDef::Derived {
            factor: 44.0 / 28.0,
            base: "N2O",
            aliases: &["nitrous_oxide_farming_style"],
        },
    ),
    ("N", GasDef::Base("nitrogen")),
    (
        "NO2",
        GasDef::Derived {
            factor: 14.0 / 46.0,
            base: "N",
            aliases: &["nitrogen_dioxide"],
        },
    ),
    // aerosol precursors
    ("NOx", GasDef::Base("NOx")),
    ("nox", alias_of("NOx")),
    ("NH3", GasDef::Base("NH3")),
    ("ammonia", alias_of("NH3")),
    ("S", GasDef::Base("sulfur")),
    (
        "SO2",
        GasDef::Derived {
            factor: 32.0 / 64.0,
            base: "S",
            aliases: &["sulfur_dioxide"],
        },
    ),
    ("SOx", alias_of("SO2")),
    ("BC", GasDef::Base("black_carbon")),
    ("OC", GasDef::Base("OC")),
    ("CO", GasDef::Base("carbon_monoxide")),
    ("VOC", GasDef::Base("VOC")),
    (
        "NMVOC",
        GasDef::Derived {
            factor: 1.0,
            base: "VOC",
            aliases: &["non_methane_volatile_organic_compounds"],
        },
    ),
    // CFCs
    ("CFC11", GasDef::Base("CFC11")),
    ("CFC12", GasDef::Base("CFC12")),
    ("CFC13", GasDef::Base("CFC13")),
    ("CFC113", GasDef::Base("CFC113")),
    ("CFC114", GasDef::Base("CFC114")),
    ("CFC115", GasDef::Base("CFC115")),
    // hydrocarbons
    ("C2H6", GasDef::Base("ethane")),
    ("HC170", alias_of("C2H6")),
    ("C3H8", GasDef::Base("propane")),
    ("HC290", alias_of("C3H8")),
    ("HC600", GasDef::Base("HC600")),
    ("butane", alias_of("HC600")),
    ("HC600a", GasDef::Base("HC600a")),
    ("isobutane", alias_of("HC600a")),
    ("HC601", GasDef::Base("HC601")),
    ("pentane", alias_of("HC601")),
    ("HC601a", GasDef::Base("HC601a")),
    ("isopentane", alias_of("HC601a")),
    ("HCE170", GasDef::Base("HCE170")),
    ("HO1270", GasDef::Base("HO1270")),
    ("propene", alias_of("HO1270")),
    // HCFCs
    ("HCFC21", GasDef::Base("HCFC21")),
    ("HCFC22", GasDef::Base("HCFC22")),
    ("HCFC31", GasDef::Base("HCFC31")),
    ("HCFC123", GasDef::Base("HCFC123")),
    ("HCFC124", GasDef::Base("HCFC124")),
    ("HCFC141b", GasDef::Base("HCFC141b")),
    ("HCFC142b", GasDef::Base("HCFC142b")),
    ("HCFC225ca", GasDef::Base("HCFC225ca")),
    ("HCFC225cb", GasDef::Base("HCFC225cb")),
    // HFCs
    ("HFC23", GasDef::Base("HFC23")),
    ("HFC32", GasDef::Base("HFC32")),
    ("HFC41", GasDef::Base("HFC41")),
    ("HFC125", GasDef::Base("HFC125")),
    ("HFC134", GasDef::Base("HFC134")),
    ("HFC134a", GasDef::Base("HFC134a")),
    ("HFC143", GasDef::Base("HFC143")),
    ("HFC143a", GasDef::Base("HFC143a")),
    ("HFC152", GasDef::Base("HFC152")),
    ("HFC152a", GasDef::Base("HFC152a")),
    ("HFC161", GasDef::Base("HFC161")),
    ("HFC227ea", GasDef::Base("HFC227ea")),
    ("HFC236cb", GasDef::Base("HFC236cb")),
    ("HFC236ea", GasDef::Base("HFC236ea")),
    ("HFC236fa", GasDef::Base("HFC236fa")),
    ("HFC245ca", GasDef::Base("HFC245ca")),
    ("HFC245fa", GasDef::Base("HFC245fa")),
    ("HFC365mfc", GasDef::Base("HFC365mfc")),
    ("HFC4310mee", GasDef::Base("HFC4310mee")),
    ("HFC4310", alias_of("HFC4310mee")),
    ("HFC1336mzz", GasDef::Base("HFC1336mzz")),
    // Halogenated gases
    ("Halon1201", GasDef::Base("Halon1201")),
    ("Halon1202", GasDef::Base("Halon1202")),
    ("Halon1211", GasDef::Base("Halon1211")),
    ("Halon1301", GasDef::Base("Halon1301")),
    ("Halon2402", GasDef::Base("Halon2402")),
    // PFCs
    ("CF4", GasDef::Base("CF4")),
    ("C2F6", GasDef::Base("C2F6")),
    ("PFC116", alias_of("C2F6")),
    ("cC3F6", GasDef::Base("cC3F6")),
    ("C3F8", GasDef::Base("C3F8")),
    ("PFC218", alias_of("C3F8")),
    ("cC4F8", GasDef::Base("cC4F8")),
    ("PFCC318", alias_of("cC4F8")),
    ("C4F10", GasDef::Base("C4F10")),
    ("C5F12", GasDef::Base("C5F12")),
    ("C6F14", GasDef::Base("C6F14")),
    ("C7F16", GasDef::Base("C7F16")),
    ("C8F18", GasDef::Base("C8F18")),
    ("C10F18", GasDef::Base("C10F18")),
    // Fluorinated ethers
    ("HFE125", GasDef::Base("HFE125")),
    ("HFE134", GasDef::Base("HFE134")),
    ("HFE143a", GasDef::Base("HFE143a")),
    ("HCFE235da2", GasDef::Base("HCFE235da2")),
    ("HFE245cb2", GasDef::Base("HFE245cb2")),
    ("HFE245fa2", GasDef::Base("HFE245fa2")),
    ("HFE347mcc3", GasDef::Base("HFE347mcc3")),
    ("HFE347pcf2", GasDef::Base("HFE347pcf2")),
    ("HFE356pcc3", GasDef::Base("HFE356pcc3")),
    ("HFE449sl", GasDef::Base("HFE449sl")),
    ("HFE569sf2", GasDef::Base("HFE569sf2")),
    ("HFE4310pccc124", GasDef::Base("HFE4310pccc124")),
    ("HFE236ca12", GasDef::Base("HFE236ca12")),
    ("HFE338pcc13", GasDef::Base("HFE338pcc13")),
    ("HFE227ea", GasDef::Base("HFE227ea")),
    ("HFE236ea2", GasDef::Base("HFE236ea2")),
    ("HFE236fa", GasDef::Base("HFE236fa")),
    ("HFE245fa1", GasDef::Base("HFE245fa1")),
    ("HFE263fb2", GasDef::Base("HFE263fb2")),
    ("HFE329mcc2", GasDef::Base("HFE329mcc2")),
    ("HFE338mcf2", GasDef::Base("HFE338mcf2")),
    ("HFE347mcf2", GasDef::Base("HFE347mcf2")),
    ("HFE356mec3", GasDef::Base("HFE356mec3")),
    ("HFE356pcf2", GasDef::Base("HFE356pcf2")),
    ("HFE356pcf3", GasDef::Base("HFE356pcf3")),
    ("HFE365mcf3", GasDef::Base("HFE365mcf3")),
    ("HFE374pc2", GasDef::Base("HFE374pc2")),
    // Perfluoropolyethers
    ("PFPMIE", GasDef::Base("PFPMIE")),
    // Hydrofluoroolefins
    ("HFO1234yf", GasDef::Base("HFO1234yf")),
    ("HFO1234ze", GasDef::Base("HFO1234ze")),
    // Misc
    ("CCl4", GasDef::Base("CCl4")),
    ("CHCl3", GasDef::Base("CHCl3")),
    ("CH2Cl2", GasDef::Base("CH2Cl2")),
    ("CH3CCl3", GasDef::Base("CH3CCl3")),
    ("CH3Cl", GasDef::Base("CH3Cl")),
    ("CH3Br", GasDef::Base("CH3Br")),
    ("SF5CF3", GasDef::Base("SF5CF3")),
    ("SF6", GasDef::Base("SF6")),
    ("SO2F2", GasDef::Base("SO2F2")),
    ("NF3", GasDef::Base("NF3")),
    ("HCO1130", GasDef::Base("HCO1130")),
];
