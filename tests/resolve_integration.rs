use vaultkit::{Error, ResolvedVia, Vault};

#[test]
fn resolves_by_filename_then_alias() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let vault_root = temp.path().join("vault");
    std::fs::create_dir_all(vault_root.join("projects"))?;

    std::fs::write(vault_root.join("projects/Alpha.md"), "# Alpha\n")?;
    std::fs::write(
        vault_root.join("projects/Project Management.md"),
        "---\naliases: [PM]\n---\n# PM\n",
    )?;

    let vault = Vault::open(&vault_root)?;

    let alpha = vault.resolve_note("Alpha")?;
    assert_eq!(alpha.via, ResolvedVia::Filename);
    assert_eq!(alpha.path.to_slash(), "projects/Alpha.md");
    assert_eq!(alpha.abs, vault.root().join("projects/Alpha.md"));

    let pm = vault.resolve_note("pm")?;
    assert_eq!(pm.via, ResolvedVia::Alias);
    assert_eq!(pm.path.to_slash(), "projects/Project Management.md");

    assert!(matches!(
        vault.resolve_note("Nothing"),
        Err(Error::NotFound(t)) if t == "Nothing"
    ));
    Ok(())
}

#[test]
fn fast_path_never_reads_contents() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let vault_root = temp.path().join("vault");
    std::fs::create_dir_all(&vault_root)?;

    std::fs::write(vault_root.join("PM.md"), "# PM\n")?;
    // Reading this note would fail as invalid UTF-8.
    std::fs::write(vault_root.join("Broken.md"), [0xff, 0xfe, 0x00])?;

    let vault = Vault::open(&vault_root)?;
    let pm = vault.resolve_note("PM")?;
    assert_eq!(pm.via, ResolvedVia::Filename);

    // A miss falls through to the alias phase, which has to read every note.
    assert!(matches!(vault.resolve_note("Other"), Err(Error::Io { .. })));
    Ok(())
}

#[test]
fn path_titles_match_exact_paths_and_suffixes() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let vault_root = temp.path().join("vault");
    std::fs::create_dir_all(vault_root.join("a/b"))?;
    std::fs::write(vault_root.join("a/b/Note.md"), "x\n")?;

    let vault = Vault::open(&vault_root)?;
    for title in ["a/b/Note", "/a/b/Note.md", "b/Note"] {
        let r = vault.resolve_note(title)?;
        assert_eq!(r.via, ResolvedVia::Path, "{title}");
        assert_eq!(r.path.to_slash(), "a/b/Note.md");
    }
    assert!(vault.resolve_note("x/Note").is_err());
    Ok(())
}

#[test]
fn resolution_ignores_trash() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let vault_root = temp.path().join("vault");
    std::fs::create_dir_all(vault_root.join("_trash"))?;
    std::fs::write(vault_root.join("_trash/Gone.md"), "x\n")?;

    let vault = Vault::open(&vault_root)?;
    assert!(matches!(vault.resolve_note("Gone"), Err(Error::NotFound(_))));
    assert!(matches!(vault.resolve_note("_trash/Gone"), Err(Error::NotFound(_))));
    Ok(())
}
