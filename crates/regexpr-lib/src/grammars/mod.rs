//! Example grammars.
//!
//! Each grammar renders its parser once, on first use, and keeps it for the
//! lifetime of the process. The registry lets tools list grammars and run
//! them by name.

pub mod macro_script;
pub mod property_list;
pub mod reassignment;
pub mod xml_int;

#[cfg(test)]
mod macro_script_tests;
#[cfg(test)]
mod reassignment_tests;

use regexpr_vm::{Parser, Productions};

use crate::Result;

/// A named grammar with a sample input.
pub struct Grammar {
    pub name: &'static str,
    pub description: &'static str,
    pub sample: &'static str,
    parser: fn() -> Result<&'static Parser>,
    show: fn(&Productions<'_>) -> String,
}

impl Grammar {
    pub fn parser(&self) -> Result<&'static Parser> {
        (self.parser)()
    }

    /// Human-readable form of the productions of a successful parse.
    pub fn show(&self, productions: &Productions<'_>) -> String {
        (self.show)(productions)
    }

    /// Parses `input` and formats the result with [`Grammar::show`].
    pub fn run(&self, input: &str) -> Result<String> {
        let productions = self.parser()?.parse(input)?;
        Ok(self.show(&productions))
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

static GRAMMARS: [Grammar; 4] = [
    Grammar {
        name: "xml-int",
        description: "integer expressions inside XML-like tags",
        sample: xml_int::SAMPLE,
        parser: xml_int::parser,
        show: xml_int::show,
    },
    Grammar {
        name: "macro-script",
        description: "`//#` macro statements mixed with code lines",
        sample: macro_script::SAMPLE,
        parser: macro_script::parser,
        show: macro_script::show,
    },
    Grammar {
        name: "reassignment",
        description: "build-log property reassignment messages",
        sample: reassignment::SAMPLE,
        parser: reassignment::parser,
        show: reassignment::show,
    },
    Grammar {
        name: "property-list",
        description: "`NAME:VALUE` property lines",
        sample: property_list::SAMPLE,
        parser: property_list::parser,
        show: property_list::show,
    },
];

pub fn all() -> &'static [Grammar] {
    &GRAMMARS
}

pub fn find(name: &str) -> Option<&'static Grammar> {
    GRAMMARS
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(name) || g.name.replace('-', "_") == name)
}
