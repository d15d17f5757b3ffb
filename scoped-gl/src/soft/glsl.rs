//! Minimal GLSL front-end: extracts the stage interface (inputs, outputs, uniforms) of a shader
//! and checks for an entry point. Function bodies are not compiled.
use std::fmt;

/// A global `in`, `out` or `uniform` variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Variable {
    pub name: String,
    pub ty: String,
    /// 1 for non-array variables, 0 for unsized arrays.
    pub array_len: usize,
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(super) struct Interface {
    pub inputs: Vec<Variable>,
    pub outputs: Vec<Variable>,
    pub uniforms: Vec<Variable>,
}

const QUALIFIERS: &[&str] = &[
    "const",
    "invariant",
    "precise",
    "flat",
    "smooth",
    "noperspective",
    "centroid",
    "sample",
    "patch",
    "lowp",
    "mediump",
    "highp",
];

/// Removes comments and preprocessor directives.
fn strip(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut line_start = true;
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&n) = chars.peek() {
                    if n == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    if n == '\n' {
                        out.push('\n');
                    }
                    prev = n;
                }
                out.push(' ');
            }
            '#' if line_start => {
                while let Some(&n) = chars.peek() {
                    if n == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            _ => {
                if c == '\n' {
                    line_start = true;
                } else if !c.is_whitespace() {
                    line_start = false;
                }
                out.push(c);
            }
        }
    }
    out
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            current.push(c);
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            if !c.is_whitespace() {
                tokens.push(c.to_string());
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Top-level items of a translation unit.
enum Item {
    /// A statement ending with `;` outside of any braces.
    Statement(String),
    /// Text before a top-level `{`: a function definition, struct or interface block.
    Block { head: String },
}

fn split_items(text: &str) -> Result<Vec<Item>, String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut pending_block: Option<String> = None;
    for c in text.chars() {
        match c {
            '{' => {
                if depth == 0 && pending_block.is_none() {
                    pending_block = Some(std::mem::take(&mut current));
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err("unexpected '}'".to_string());
                }
                depth -= 1;
                if depth == 0 {
                    if let Some(head) = pending_block.as_ref() {
                        if head.contains('(') {
                            // function definition: no trailing semicolon
                            items.push(Item::Block {
                                head: head.clone(),
                            });
                            pending_block = None;
                            current.clear();
                        }
                    }
                }
            }
            ';' if depth == 0 => {
                match pending_block.take() {
                    Some(head) => items.push(Item::Block { head }),
                    None => items.push(Item::Statement(std::mem::take(&mut current))),
                }
                current.clear();
            }
            _ => {
                if depth == 0 {
                    current.push(c);
                }
            }
        }
    }
    if depth != 0 || pending_block.is_some() {
        return Err("unexpected end of file: unbalanced braces".to_string());
    }
    if !current.trim().is_empty() {
        return Err(format!("syntax error: expected ';' after '{}'", current.trim()));
    }
    Ok(items)
}

/// Storage qualifier of a global declaration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Storage {
    In,
    Out,
    Uniform,
}

fn parse_declaration(
    tokens: &[String],
    storage_for: impl Fn(&str) -> Option<Storage>,
) -> Result<Option<(Storage, Vec<Variable>)>, String> {
    let mut i = 0;
    let mut storage = None;
    // qualifiers, in any order
    while i < tokens.len() {
        let t = tokens[i].as_str();
        if t == "layout" {
            // skip the parenthesized layout qualifier list
            i += 1;
            if tokens.get(i).map(String::as_str) != Some("(") {
                return Err("syntax error: expected '(' after 'layout'".to_string());
            }
            while i < tokens.len() && tokens[i] != ")" {
                i += 1;
            }
            i += 1;
        } else if QUALIFIERS.contains(&t) {
            i += 1;
        } else if let Some(s) = storage_for(t) {
            storage = Some(s);
            i += 1;
        } else {
            break;
        }
    }
    let storage = match storage {
        Some(storage) => storage,
        None => return Ok(None),
    };

    let ty = match tokens.get(i) {
        Some(t) if is_identifier(t) => t.clone(),
        _ => return Err("syntax error: expected a type name".to_string()),
    };
    i += 1;

    let mut variables = Vec::new();
    loop {
        let name = match tokens.get(i) {
            Some(t) if is_identifier(t) => t.clone(),
            _ => return Err(format!("syntax error: expected an identifier after '{}'", ty)),
        };
        i += 1;
        let mut array_len = 1;
        if tokens.get(i).map(String::as_str) == Some("[") {
            i += 1;
            array_len = match tokens.get(i).map(String::as_str) {
                Some("]") => 0,
                Some(n) => {
                    i += 1;
                    n.parse::<usize>()
                        .map_err(|_| format!("array size of '{}' must be a constant", name))?
                }
                None => return Err("unexpected end of declaration".to_string()),
            };
            if tokens.get(i).map(String::as_str) != Some("]") {
                return Err(format!("syntax error: expected ']' after '{}'", name));
            }
            i += 1;
        }
        // initializers (uniforms may have one): skip to the next declarator
        if tokens.get(i).map(String::as_str) == Some("=") {
            let mut parens = 0i32;
            while i < tokens.len() {
                match tokens[i].as_str() {
                    "(" => parens += 1,
                    ")" => parens -= 1,
                    "," if parens == 0 => break,
                    _ => {}
                }
                i += 1;
            }
        }
        variables.push(Variable {
            name,
            ty: ty.clone(),
            array_len,
        });
        match tokens.get(i).map(String::as_str) {
            None => break,
            Some(",") => i += 1,
            Some(t) => return Err(format!("syntax error: unexpected '{}'", t)),
        }
    }
    Ok(Some((storage, variables)))
}

fn is_main(head: &str) -> bool {
    let tokens = tokenize(head);
    matches!(
        tokens.iter().map(String::as_str).collect::<Vec<_>>().as_slice(),
        ["void", "main", "(", ")"] | ["void", "main", "(", "void", ")"]
    )
}

/// Extracts the interface of a shader. `vertex` selects how the legacy `attribute` and `varying`
/// qualifiers are read. On failure, returns the compiler log.
pub(super) fn compile(source: &str, vertex: bool) -> Result<Interface, String> {
    let text = strip(source);
    let items = split_items(&text).map_err(|e| format!("0:0: error: {}", e))?;

    let storage_for = |t: &str| match t {
        "in" => Some(Storage::In),
        "out" => Some(Storage::Out),
        "uniform" => Some(Storage::Uniform),
        "attribute" if vertex => Some(Storage::In),
        "varying" if vertex => Some(Storage::Out),
        "varying" => Some(Storage::In),
        _ => None,
    };

    let mut interface = Interface::default();
    let mut has_main = false;
    let mut errors = Vec::new();
    for item in items {
        match item {
            Item::Block { head } => {
                if is_main(&head) {
                    if has_main {
                        errors.push("0:0: error: redefinition of 'main'".to_string());
                    }
                    has_main = true;
                }
                // interface blocks and structs are not reflected
            }
            Item::Statement(text) => {
                let tokens = tokenize(&text);
                if tokens.is_empty() {
                    continue;
                }
                match parse_declaration(&tokens, &storage_for) {
                    Ok(Some((storage, variables))) => {
                        let list = match storage {
                            Storage::In => &mut interface.inputs,
                            Storage::Out => &mut interface.outputs,
                            Storage::Uniform => &mut interface.uniforms,
                        };
                        for v in variables {
                            if list.iter().any(|u| u.name == v.name) {
                                errors.push(format!("0:0: error: redeclaration of '{}'", v.name));
                            } else {
                                list.push(v);
                            }
                        }
                    }
                    Ok(None) => {}
                    Err(e) => errors.push(format!("0:0: error: {}", e)),
                }
            }
        }
    }
    if !has_main {
        errors.push("0:0: error: no definition of 'main' found".to_string());
    }
    if errors.is_empty() {
        Ok(interface)
    } else {
        Err(errors.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(ty: &str, name: &str) -> Variable {
        Variable {
            name: name.to_string(),
            ty: ty.to_string(),
            array_len: 1,
        }
    }

    #[test]
    fn test_interface_extraction() {
        let source = r"
            #version 330 core
            // inputs
            layout(location = 0) in vec3 position;
            in vec2 texcoord;
            /* block
               comment */
            out vec2 uv;
            uniform mat4 model, view;
            uniform highp vec4 colors[4];
            uniform sampler2D tex;
            uniform Block { vec4 x; } block;
            void main() {
                uv = texcoord;
                gl_Position = view * model * vec4(position, 1.0);
            }
        ";
        let interface = compile(source, true).unwrap();
        assert_eq!(
            interface.inputs,
            vec![var("vec3", "position"), var("vec2", "texcoord")]
        );
        assert_eq!(interface.outputs, vec![var("vec2", "uv")]);
        let names: Vec<_> = interface.uniforms.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["model", "view", "colors", "tex"]);
        assert_eq!(interface.uniforms[2].array_len, 4);
    }

    #[test]
    fn test_missing_main() {
        let log = compile("int x;", true).unwrap_err();
        assert!(log.contains("main"));
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(compile("void main() {", false).is_err());
        assert!(compile("void main() {}}", false).is_err());
    }

    #[test]
    fn test_legacy_qualifiers() {
        let source = "attribute vec4 p; varying float f; void main(void) { }";
        let vs = compile(source, true).unwrap();
        assert_eq!(vs.inputs, vec![var("vec4", "p")]);
        assert_eq!(vs.outputs, vec![var("float", "f")]);
        let fs = compile("varying float f; void main() {}", false).unwrap();
        assert_eq!(fs.inputs, vec![var("float", "f")]);
    }

    #[test]
    fn test_redeclaration_is_an_error() {
        let log = compile("in vec2 a; in vec3 a; void main() {}", false).unwrap_err();
        assert!(log.contains("redeclaration of 'a'"));
    }
}
