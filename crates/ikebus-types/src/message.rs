//! Message templates, typed arguments and the renderer.
//!
//! Templates use printf-style conversions. Rendering is deferred until a
//! consumer first asks for the text and is cached afterwards, so events
//! nobody reads never pay for formatting.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::OnceLock;

use crate::sa::SaHandle;

/// A positional argument for a message template.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Boolean, rendered as `yes`/`no`.
    Bool(bool),
    /// Security association, rendered as `name[id]`.
    Sa(SaHandle),
}

impl Arg {
    /// Renders any `Display` value into a text argument.
    pub fn display(value: impl std::fmt::Display) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<SaHandle> for Arg {
    fn from(value: SaHandle) -> Self {
        Self::Sa(value)
    }
}

impl From<&SaHandle> for Arg {
    fn from(value: &SaHandle) -> Self {
        Self::Sa(value.clone())
    }
}

macro_rules! int_args {
    ($variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Self::$variant(value as $wide)
                }
            }
        )+
    };
}

int_args!(Int as i64: i8, i16, i32, i64, isize);
int_args!(Uint as u64: u8, u16, u32, u64, usize);

/// A template bound to its arguments, or text that is already rendered.
#[derive(Debug)]
pub struct Message {
    template: Cow<'static, str>,
    args: Vec<Arg>,
    rendered: OnceLock<String>,
}

impl Message {
    /// Binds a template to its positional arguments without rendering.
    pub fn new(template: impl Into<Cow<'static, str>>, args: Vec<Arg>) -> Self {
        Self {
            template: template.into(),
            args,
            rendered: OnceLock::new(),
        }
    }

    /// Wraps text that needs no formatting.
    pub fn rendered(text: impl Into<String>) -> Self {
        let text = text.into();
        let rendered = OnceLock::new();
        let _ = rendered.set(text.clone());
        Self {
            template: Cow::Owned(text),
            args: Vec::new(),
            rendered,
        }
    }

    /// The raw template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The raw arguments.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Whether the text has been rendered yet.
    pub fn is_rendered(&self) -> bool {
        self.rendered.get().is_some()
    }

    /// The rendered text, formatting it on first call.
    pub fn text(&self) -> &str {
        self.rendered
            .get_or_init(|| render(&self.template, &self.args))
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

impl From<&'static str> for Message {
    fn from(text: &'static str) -> Self {
        Self::new(text, Vec::new())
    }
}

/// Substitutes positional arguments into a printf-style template.
///
/// Supports `%s`, `%d`, `%i`, `%u`, `%x` and `%X`; `%%` is a literal
/// percent sign. A missing argument renders as `(null)`, surplus arguments
/// are ignored and unknown conversions are copied as-is.
pub fn render(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&conv) = chars.peek() else {
            out.push('%');
            break;
        };
        match conv {
            '%' => {
                chars.next();
                out.push('%');
            }
            's' | 'd' | 'i' | 'u' | 'x' | 'X' => {
                chars.next();
                match args.next() {
                    Some(arg) => write_arg(&mut out, conv, arg),
                    None => out.push_str("(null)"),
                }
            }
            _ => out.push('%'),
        }
    }
    out
}

fn write_arg(out: &mut String, conv: char, arg: &Arg) {
    // Writing into a String cannot fail.
    let _ = match (conv, arg) {
        ('x', Arg::Int(v)) => write!(out, "{v:x}"),
        ('x', Arg::Uint(v)) => write!(out, "{v:x}"),
        ('X', Arg::Int(v)) => write!(out, "{v:X}"),
        ('X', Arg::Uint(v)) => write!(out, "{v:X}"),
        (_, Arg::Str(v)) => write!(out, "{v}"),
        (_, Arg::Int(v)) => write!(out, "{v}"),
        (_, Arg::Uint(v)) => write!(out, "{v}"),
        (_, Arg::Bool(v)) => write!(out, "{}", if *v { "yes" } else { "no" }),
        (_, Arg::Sa(v)) => write!(out, "{v}"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa::NamedSa;

    #[test]
    fn substitutes_in_order() {
        let text = render(
            "established %s with %d policies",
            &[Arg::from("tunnel0"), Arg::from(2)],
        );
        assert_eq!(text, "established tunnel0 with 2 policies");
    }

    #[test]
    fn hex_and_literal_percent() {
        assert_eq!(render("spi %x (%X) 100%%", &[Arg::from(255u32), Arg::from(171u32)]), "spi ff (AB) 100%");
    }

    #[test]
    fn missing_and_surplus_arguments() {
        assert_eq!(render("%s and %s", &[Arg::from("one")]), "one and (null)");
        assert_eq!(render("only %s", &[Arg::from("a"), Arg::from("b")]), "only a");
    }

    #[test]
    fn unknown_conversion_is_verbatim() {
        assert_eq!(render("50%q done %", &[]), "50%q done %");
    }

    #[test]
    fn renders_sa_and_bool() {
        let sa = NamedSa::handle("home", 3);
        assert_eq!(
            render("%s up=%s", &[Arg::from(&sa), Arg::from(true)]),
            "home[3] up=yes"
        );
    }

    #[test]
    fn display_args_are_substituted_as_text() {
        let addr = std::net::Ipv4Addr::new(192, 0, 2, 1);
        let arg = Arg::display(addr);
        assert_eq!(arg, Arg::Str("192.0.2.1".to_string()));
        assert_eq!(render("peer %s, %x", &[arg.clone(), arg]), "peer 192.0.2.1, 192.0.2.1");
    }

    #[test]
    fn rendering_is_lazy_and_cached() {
        let message = Message::new("peer %s", vec![Arg::from("moon")]);
        assert!(!message.is_rendered());
        assert_eq!(message.text(), "peer moon");
        assert!(message.is_rendered());
        assert_eq!(message.template(), "peer %s");
    }

    #[test]
    fn pre_rendered_text_is_ready() {
        let message = Message::rendered("already 100% done");
        assert!(message.is_rendered());
        assert_eq!(message.text(), "already 100% done");
    }
}
