/// Asserts that the store holds `coordinate` with the given activation.
#[macro_export]
macro_rules! assert_cell_activation {
    ($store:expr, $x:expr, $y:expr, $activation:expr) => {
        let cell = $store
            .get(neurostream_data::CellCoordinate::new($x, $y))
            .expect("Cell not found in store");
        assert!(
            (cell.activation - $activation).abs() < 1e-9,
            "Cell ({}, {}) activation {} is not {}",
            $x,
            $y,
            cell.activation,
            $activation
        );
    };
}

/// Asserts the session's connection status.
#[macro_export]
macro_rules! assert_connection {
    ($session:expr, $status:expr) => {
        let actual = $session.connection_status();
        assert_eq!(
            actual, $status,
            "Expected connection {:?}, got {:?}",
            $status, actual
        );
    };
}
