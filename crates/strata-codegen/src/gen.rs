//! The code emitter.

use std::rc::Rc;

use strata_types::Type;

use crate::iu::{Iu, IuRef};

/// Per-compilation emission context.
///
/// Owns the output text and the monotonic counter behind IU varnames and
/// `fresh` identifiers, so independent compilations never alias names.
/// The emitter keeps no semantic state; well-formedness of the output is
/// the operators' responsibility.
#[derive(Debug)]
pub struct Codegen {
    out: String,
    counter: u32,
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

impl Codegen {
    pub fn new() -> Self {
        Codegen {
            out: String::new(),
            counter: 1,
        }
    }

    /// Append one line of generated source.
    pub fn emit(&mut self, line: impl AsRef<str>) {
        self.out.push_str(line.as_ref());
        self.out.push('\n');
    }

    /// Emit `header {`, run `body`, emit `}`. `header` may be empty.
    pub fn block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.emit(format!("{header} {{"));
        body(self);
        self.emit("}");
    }

    /// A fresh identifier: `base` plus the monotonic counter.
    pub fn fresh(&mut self, base: &str) -> String {
        let n = self.counter;
        self.counter += 1;
        format!("{base}{n}")
    }

    /// Create an IU; its varname and id are drawn from the same counter as
    /// [`Codegen::fresh`], which keeps all generated names unique.
    pub fn new_iu(&mut self, name: &str, ty: Type) -> IuRef {
        let id = self.counter;
        let varname = self.fresh(name);
        Rc::new(Iu {
            name: name.to_string(),
            ty,
            varname,
            id,
        })
    }

    /// Bind an IU to a value in the current scope.
    pub fn provide(&mut self, iu: &IuRef, value: impl AsRef<str>) {
        self.emit(format!(
            "{} {} = {};",
            iu.ty.cpp_name(),
            iu.varname,
            value.as_ref()
        ));
    }

    /// Finish the compilation and take the emitted text.
    pub fn finish(self) -> String {
        self.out
    }
}
