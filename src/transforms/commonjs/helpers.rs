//! Interop helpers referenced by the generated code. Each helper is declared
//! once per module, under a fresh name, after the rest of the body.

use oxc_allocator::Vec as ArenaVec;
use oxc_ast::{AstBuilder, ast::Statement};
use oxc_parser::Parser;
use oxc_span::{Atom, SourceType};

use super::scope::UidGenerator;
use crate::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Helper {
    InteropRequireDefault,
    InteropRequireWildcard,
}

impl Helper {
    fn base_name(self) -> &'static str {
        match self {
            Helper::InteropRequireDefault => "interopRequireDefault",
            Helper::InteropRequireWildcard => "interopRequireWildcard",
        }
    }

    fn source(self, name: &str) -> String {
        match self {
            Helper::InteropRequireDefault => format!(
                "function {name}(obj) {{ return obj && obj.__esModule ? obj : {{ default: obj }}; }}"
            ),
            Helper::InteropRequireWildcard => format!(
                "function {name}(obj) {{
  if (obj && obj.__esModule) {{
    return obj;
  }} else {{
    var newObj = {{}};
    if (obj != null) {{
      for (var key in obj) {{
        if (Object.prototype.hasOwnProperty.call(obj, key)) {{
          var desc = Object.defineProperty && Object.getOwnPropertyDescriptor ? Object.getOwnPropertyDescriptor(obj, key) : {{}};
          if (desc.get || desc.set) {{
            Object.defineProperty(newObj, key, desc);
          }} else {{
            newObj[key] = obj[key];
          }}
        }}
      }}
    }}
    newObj.default = obj;
    return newObj;
  }}
}}"
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct Helpers<'a> {
    used: Vec<(Helper, Atom<'a>)>,
}

impl<'a> Helpers<'a> {
    /// Name under which `helper` is reachable, declaring it on first use.
    pub fn name(&mut self, ast: AstBuilder<'a>, uids: &mut UidGenerator, helper: Helper) -> Atom<'a> {
        if let Some((_, name)) = self.used.iter().find(|(h, _)| *h == helper) {
            return *name;
        }
        let name = ast.atom(&uids.generate(helper.base_name()));
        self.used.push((helper, name));
        name
    }

    /// Declarations for every helper handed out, in first-use order.
    pub fn declarations(&self, ast: AstBuilder<'a>) -> Result<ArenaVec<'a, Statement<'a>>, Error> {
        let mut out = ast.vec();
        for (helper, name) in &self.used {
            let source_text = ast.str(&helper.source(name));
            let parse_ret = Parser::new(ast.allocator, source_text, SourceType::cjs()).parse();
            if let Some(error) = parse_ret.errors.first() {
                return Err(Error::ParseFailed(error.to_string()));
            }
            out.extend(parse_ret.program.body);
        }
        Ok(out)
    }
}
