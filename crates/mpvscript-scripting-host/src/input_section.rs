//! Renders a binding registry into the host's input sections.

use mpvscript_client::{Host, InputFlags, InputSection};
use mpvscript_events::ClientIdentity;
use tracing::debug;

use crate::bindings::BindingRegistry;

pub fn builtin_section_name(identity: &ClientIdentity) -> String {
    format!("py_{}_kbs_builtin", identity)
}

pub fn section_name(identity: &ClientIdentity) -> String {
    format!("py_{}_kbs", identity)
}

pub fn section_location(identity: &ClientIdentity) -> String {
    format!("py_{}_bs", identity)
}

/// The builtin and regular sections for one client; either is absent when
/// it would have no lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledSections {
    pub builtin: Option<InputSection>,
    pub regular: Option<InputSection>,
}

impl CompiledSections {
    pub fn is_empty(&self) -> bool {
        self.builtin.is_none() && self.regular.is_none()
    }

    /// Builtin section first, then the regular one
    pub fn sections(&self) -> impl Iterator<Item = &InputSection> {
        self.builtin.iter().chain(self.regular.iter())
    }

    /// Define each section on the host and enable it on top
    pub fn apply(&self, host: &dyn Host) {
        for section in self.sections() {
            debug!(
                target: "scripting",
                "Defining input section {} with {} binding(s)",
                section.name,
                section.lines.len()
            );
            host.define_input_section(section);
            host.enable_input_section(&section.name, InputFlags::ON_TOP);
        }
    }
}

/// Partition bindings that have an input line by their builtin flag and sort
/// each group by line text
pub fn compile(registry: &BindingRegistry) -> CompiledSections {
    let identity = registry.identity();
    let mut builtin = Vec::new();
    let mut regular = Vec::new();

    for binding in registry.bindings() {
        let Some(input) = &binding.input else {
            continue;
        };
        if binding.builtin {
            builtin.push(input.clone());
        } else {
            regular.push(input.clone());
        }
    }

    let section = |name: String, mut lines: Vec<String>, builtin: bool| {
        if lines.is_empty() {
            return None;
        }
        lines.sort();
        Some(InputSection {
            name,
            location: section_location(identity),
            lines,
            builtin,
            owner: identity.to_string(),
        })
    };

    CompiledSections {
        builtin: section(builtin_section_name(identity), builtin, true),
        regular: section(section_name(identity), regular, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::BindingSpec;
    use mpvscript_client::{HostCall, MemoryHost};

    fn registry() -> BindingRegistry {
        BindingRegistry::new(ClientIdentity::new("demo"))
    }

    #[test]
    fn test_empty_registry_compiles_to_nothing() {
        let sections = compile(&registry());
        assert!(sections.is_empty());
        assert_eq!(sections.sections().count(), 0);
    }

    #[test]
    fn test_bindings_without_keys_are_skipped() {
        let mut reg = registry();
        let _ = reg.add_binding(BindingSpec::new().name("a"));
        assert!(compile(&reg).is_empty());
    }

    #[test]
    fn test_regular_lines_sorted() {
        let mut reg = registry();
        let _ = reg.add_binding(BindingSpec::new().key("z").name("last"));
        let _ = reg.add_binding(BindingSpec::new().key("a").name("first"));
        let sections = compile(&reg);
        assert!(sections.builtin.is_none());

        let regular = sections.regular.unwrap();
        assert_eq!(regular.name, "py_demo_kbs");
        assert_eq!(regular.location, "py_demo_bs");
        assert_eq!(regular.owner, "demo");
        assert!(!regular.builtin);
        assert_eq!(
            regular.contents(),
            "\na script-binding python/demo___first\nz script-binding python/demo___last"
        );
    }

    #[test]
    fn test_builtin_partition() {
        let mut reg = registry();
        let _ = reg.add_binding(BindingSpec::new().key("b").name("one").builtin(true));
        let _ = reg.add_binding(BindingSpec::new().key("c").name("two"));
        let sections = compile(&reg);

        let builtin = sections.builtin.unwrap();
        assert_eq!(builtin.name, "py_demo_kbs_builtin");
        assert_eq!(builtin.location, "py_demo_bs");
        assert!(builtin.builtin);
        assert_eq!(builtin.lines, vec!["b script-binding python/demo___one".to_string()]);

        let regular = sections.regular.unwrap();
        assert_eq!(regular.lines, vec!["c script-binding python/demo___two".to_string()]);
    }

    #[test]
    fn test_apply_defines_then_enables_on_top() {
        let mut reg = registry();
        let _ = reg.add_binding(BindingSpec::new().key("b").builtin(true));
        let _ = reg.add_binding(BindingSpec::new().key("c"));
        let host = MemoryHost::new();
        let sections = compile(&reg);
        sections.apply(&host);

        let calls = host.calls();
        assert_eq!(calls.len(), 4);
        assert!(matches!(&calls[0], HostCall::DefineSection(s) if s.name == "py_demo_kbs_builtin"));
        assert_eq!(
            calls[1],
            HostCall::EnableSection("py_demo_kbs_builtin".into(), InputFlags::ON_TOP)
        );
        assert!(matches!(&calls[2], HostCall::DefineSection(s) if s.name == "py_demo_kbs"));
        assert_eq!(
            calls[3],
            HostCall::EnableSection("py_demo_kbs".into(), InputFlags::ON_TOP)
        );
    }
}
