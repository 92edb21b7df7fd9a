//! Built-in release notes templates
//!
//! [Tera](https://github.com/Keats/tera) templates, one per release context.
//! Each can be replaced from the `[notes]` table of `release-engine.toml`.
//!
//! Variables shared by every template: `version`, `major_tag`,
//! `action_reference`. The manual and custom templates also get `since`,
//! `recommendation`, `suggested_kind`, `requested_kind`, `breaking_hint` and
//! `breaking_count`.

/// Dependency update notes.
///
/// Extra variables: `icon`, `package`, `old_version`, `new_version`,
/// `has_package`, `has_upstream_notes`, `upstream_notes`.
pub const DEPENDENCY: &str = r#"## {{ icon }} Dependency Update: {{ package }}

### 🚀 What's Updated
- **{{ package }}**: `{{ old_version }}` → `{{ new_version }}`

### 📋 Upstream Release Notes
{% if has_upstream_notes -%}
{{ upstream_notes }}
{% else -%}
This release updates the following dependency:
- **{{ package }}**: {{ old_version }} → {{ new_version }}
{% if has_package %}
#### 🔗 References
- [📋 Full Release Notes](https://github.com/{{ package }}/releases/tag/{{ new_version }})
- [📊 Compare Changes](https://github.com/{{ package }}/compare/{{ old_version }}...{{ new_version }})
{% endif -%}
{% endif %}
### 🔧 Maintenance
- Automated dependency update via Dependabot
- All tests passing ✅
- Security and compatibility verified

---

### 🚀 Usage
Update your workflows to use the latest version:
```yaml
uses: {{ action_reference }}@{{ major_tag }}
```

*This release was automatically created by our dependency management system.*
"#;

/// Manual release notes generated from the change set.
///
/// Extra variables: `no_changes`, `sections` (`heading`, `entries` with
/// `scope` and `description`), `statistics` (`label`, `count`),
/// `commit_count`.
pub const MANUAL: &str = r#"## 🚀 Release {{ version }}

{% if no_changes -%}
_No notable changes since {{ since }}._

{% endif -%}
{% for section in sections -%}
### {{ section.heading }}
{% for entry in section.entries -%}
- {% if entry.scope %}**{{ entry.scope }}**: {% endif %}{{ entry.description }}
{% endfor %}
{% endfor -%}
### 📊 Statistics
{% for stat in statistics -%}
- {{ stat.label }}: {{ stat.count }}
{% endfor -%}
{% if breaking_count > 0 -%}
- Breaking Changes: {{ breaking_count }}
{% endif -%}
- **Total commits**: {{ commit_count }}

{% if recommendation -%}
> ⚠️ **Version recommendation:** the commits since {{ since }} suggest a **{{ suggested_kind }}** release, but a **{{ requested_kind }}** release was configured.
{% if breaking_hint -%}
> 💥 {{ breaking_count }} breaking change(s) detected; consider a **major** release.
{% endif %}
{% endif -%}
---

### 🚀 Usage
Update your workflows to use the latest version:
```yaml
uses: {{ action_reference }}@{{ major_tag }}
```

*This release was generated from {{ commit_count }} commit(s) since {{ since }}.*
"#;

/// Manual release with user-supplied notes, kept verbatim.
///
/// Extra variables: `custom_notes`.
pub const CUSTOM: &str = r#"{{ custom_notes }}

{% if recommendation -%}
> ⚠️ **Version recommendation:** the commits since {{ since }} suggest a **{{ suggested_kind }}** release, but a **{{ requested_kind }}** release was configured.
{% if breaking_hint -%}
> 💥 {{ breaking_count }} breaking change(s) detected; consider a **major** release.
{% endif %}
{% endif -%}
---

### 🚀 Usage
Update your workflows to use the latest version:
```yaml
uses: {{ action_reference }}@{{ major_tag }}
```

*Release {{ version }} was published manually.*
"#;
