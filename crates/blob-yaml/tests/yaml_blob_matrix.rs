use blob_core::pointer::parse_pointer;
use blob_core::{path, Blob, Key, Node};
use blob_yaml::{
    from_reader, parse, parse_blob, read_file, serialize, to_writer, to_yaml, write_file,
    YamlError,
};

#[test]
fn document_roundtrip_matrix() {
    let cases = [
        "null\n",
        "3\n",
        "text\n",
        "[]\n",
        "{}\n",
        "a:\n  - 1\n  - 2.5\n  - b: null\nc:\n  d:\n    - true\n    - false\n",
        "- - - deep\n",
        "0: zero\n7: seven\nname: \"yes\"\n",
    ];
    for text in cases {
        let node = parse(text).unwrap();
        assert_eq!(to_yaml(&node), text, "{text:?}");
    }
}

#[test]
fn strings_survive_a_roundtrip_matrix() {
    let strings = [
        "", "~", "true", "Off", "42", "-7", "3.5e2", "0x1f", ".nan", "key: value", "# note",
        "a # b", "trailing ", " leading", "line\nbreak", "tab\there", "quote\"inside", "'single'",
        "[not a list]", "{not a map}", "*ref", "&anchor", "!tag", "@at", "%pct", "...", "ok",
    ];
    for s in strings {
        let blob = Blob::new();
        blob.put(&path!["s"], s);
        blob.put(&[Key::from(s)], "as key");
        let back = parse_blob(&serialize(&blob)).unwrap();
        assert_eq!(back.get(&path!["s"]), Some(Node::from(s)), "{s:?}");
        assert_eq!(back.get(&[Key::from(s)]), Some(Node::from("as key")), "{s:?}");
    }
}

#[test]
fn edit_parsed_document_matrix() {
    let blob = parse_blob(concat!(
        "servers:\n",
        "  - host: a\n",
        "  - host: b\n",
        "    port: 22\n",
    ))
    .unwrap();

    blob.put(&parse_pointer("/servers/1/port"), 8080);
    blob.add(&parse_pointer("/servers/0/tags"), "primary").unwrap();
    blob.remove(&parse_pointer("/servers/1/host"));

    assert_eq!(
        serialize(&blob),
        concat!(
            "servers:\n",
            "  - host: a\n",
            "    tags:\n",
            "      - primary\n",
            "  - port: 8080\n",
        )
    );
}

#[test]
fn slice_edits_show_in_serialized_parent_matrix() {
    let blob = parse_blob("cfg:\n  name: x\n").unwrap();
    let cfg = blob.slice(&path!["cfg"]);
    cfg.put(&path!["level"], 2);
    blob.slice(&path!["cfg", "logs"]).add(&path![], "started").unwrap();

    assert_eq!(
        serialize(&blob),
        "cfg:\n  name: x\n  level: 2\n  logs:\n    - started\n"
    );
}

#[test]
fn reader_and_writer_matrix() {
    let text = "list:\n  - a\n  - b\nflag: false\n";
    let blob = from_reader(text.as_bytes()).unwrap();
    assert_eq!(blob.get(&path!["list", 1]), Some(Node::from("b")));
    assert_eq!(blob.get_bool(&path!["flag"]), Some(false));

    let mut buf = Vec::new();
    to_writer(&blob, &mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), text);

    assert_eq!(from_reader(&b""[..]).unwrap().root(), None);
    assert!(matches!(
        from_reader(&b"a: [1"[..]),
        Err(YamlError::Syntax(_))
    ));
    assert!(matches!(
        from_reader(&[0xff, 0xfe][..]),
        Err(YamlError::Io(_))
    ));
}

#[test]
fn file_roundtrip_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("doc.yaml");

    let blob = Blob::new();
    blob.put(&path!["db", "host"], "localhost");
    blob.put(&path!["db", "ports", 0], 5432);
    write_file(&blob, &file).unwrap();

    let back = read_file(&file).unwrap();
    assert_eq!(back.get_str(&path!["db", "host"]).as_deref(), Some("localhost"));
    assert_eq!(back.get_i64(&path!["db", "ports", 0]), Some(5432));
    assert_eq!(back.root(), blob.root());

    assert!(matches!(
        read_file(dir.path().join("missing.yaml")),
        Err(YamlError::Io(_))
    ));
}
