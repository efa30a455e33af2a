//! Download callbacks: a click count in, a browser download payload out.

pub mod error;
pub mod gate;
pub mod payload;
pub mod table;

pub use error::DownloadError;
pub use gate::ClickGate;
pub use payload::{
    Download, DownloadOptions, DownloadPayload, DownloadSource, send_bytes, send_file,
    send_string, send_writer,
};
pub use table::{DataTable, TableOptions, send_table};

#[cfg(test)]
mod tests {
    use super::*;
    use dashvtk_nodes::NodeType;
    use dashvtk_scene::NodeBuilder;
    use dashvtk_variant::Variant;
    use std::io::Write;

    #[test]
    fn bytes_are_base64_encoded() {
        let payload = send_bytes(vec![0u8, 159, 146, 150], "blob.bin", DownloadOptions::default())
            .into_payload()
            .unwrap();
        assert!(payload.base64);
        assert_eq!(payload.content, "AJ+Slg==");
        assert_eq!(payload.decoded().unwrap(), vec![0u8, 159, 146, 150]);
    }

    #[test]
    fn text_is_sent_verbatim() {
        let payload = send_string("hello", "hello.txt", DownloadOptions::with_type("text/plain"))
            .into_payload()
            .unwrap();
        assert!(!payload.base64);
        assert_eq!(payload.content, "hello");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "text/plain");
        assert_eq!(json["filename"], "hello.txt");
        assert_eq!(json["base64"], false);
    }

    #[test]
    fn empty_filename_is_rejected() {
        let err = send_string("x", "  ", DownloadOptions::default())
            .into_payload()
            .unwrap_err();
        assert!(matches!(err, DownloadError::EmptyFilename));
    }

    #[test]
    fn writer_runs_on_payload() {
        let download = send_writer(
            |out: &mut dyn Write| {
                out.write_all(b"abc")?;
                Ok(())
            },
            "abc.bin",
            DownloadOptions::default(),
        );
        let payload = download.into_payload().unwrap();
        assert_eq!(payload.decoded().unwrap(), b"abc".to_vec());

        let text = send_writer(
            |out: &mut dyn Write| Ok(out.write_all(&[0xff, 0xfe])?),
            "bad.txt",
            DownloadOptions {
                text: true,
                ..DownloadOptions::default()
            },
        );
        assert!(matches!(text.into_payload(), Err(DownloadError::NotUtf8)));
    }

    #[test]
    fn click_gate_skips_initial_call() {
        let gate = ClickGate::default();
        let make = |clicks: u64| Ok(send_string(format!("{clicks}"), "n.txt", DownloadOptions::default()));

        assert_eq!(gate.on_click(None, make).unwrap(), None);
        assert_eq!(gate.on_click(Some(0), make).unwrap(), None);
        let payload = gate.on_click(Some(3), make).unwrap().unwrap();
        assert_eq!(payload.content, "3");

        let eager = ClickGate {
            prevent_initial_call: false,
        };
        assert!(eager.should_fire(None));
        assert_eq!(eager.on_click(None, make).unwrap().unwrap().content, "0");
    }

    #[test]
    fn table_exports_csv() {
        let mut table = DataTable::new(["x", "label"]);
        table.push_row(vec![Variant::from(1), Variant::from("a,b")]).unwrap();
        table.push_row(vec![Variant::from(2.5), Variant::Null]).unwrap();
        assert!(table.push_row(vec![Variant::from(1)]).is_err());

        let csv = table.to_csv_string(&TableOptions::default()).unwrap();
        assert_eq!(csv, "x,label\n1,\"a,b\"\n2.5,\n");

        let indexed = table
            .select(&["label"])
            .unwrap()
            .to_csv_string(&TableOptions {
                index: true,
                delimiter: b';',
                ..TableOptions::default()
            })
            .unwrap();
        assert_eq!(indexed, ";label\n0;a,b\n1;\n");
        assert!(matches!(
            table.select(&["y"]),
            Err(DownloadError::UnknownColumn(_))
        ));
    }

    #[test]
    fn data_array_becomes_table() {
        let node = NodeBuilder::new(NodeType::DataArray)
            .prop("name", "normals")
            .prop("values", [0, 0, 1, 0, 1, 0])
            .prop("numberOfComponents", 3)
            .build()
            .unwrap();
        let table = DataTable::from_data_array(&node).unwrap();
        assert_eq!(table.columns(), ["normals_0", "normals_1", "normals_2"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.column("normals_2").unwrap(), vec![&Variant::from(1), &Variant::from(0)]);

        let scalars = NodeBuilder::new(NodeType::DataArray)
            .prop("values", [4, 5])
            .build()
            .unwrap();
        assert_eq!(DataTable::from_data_array(&scalars).unwrap().columns(), ["scalars"]);

        let not_array = NodeBuilder::new(NodeType::PointData).build().unwrap();
        assert!(DataTable::from_data_array(&not_array).is_err());
    }

    #[test]
    fn table_download_is_text_csv() {
        let mut table = DataTable::new(["v"]);
        table.push_row(vec![Variant::from(7)]).unwrap();
        let payload = send_table(table, "values.csv", TableOptions::default())
            .into_payload()
            .unwrap();
        assert!(!payload.base64);
        assert_eq!(payload.mime_type.as_deref(), Some("text/csv"));
        assert_eq!(payload.content, "v\n7\n");
    }

    #[test]
    fn file_download_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.vtks");
        std::fs::write(&path, "[View][/View]").unwrap();

        let payload = send_file(&path, DownloadOptions::default())
            .unwrap()
            .into_payload()
            .unwrap();
        assert_eq!(payload.filename, "scene.vtks");
        assert_eq!(payload.decoded().unwrap(), b"[View][/View]".to_vec());
    }
}
