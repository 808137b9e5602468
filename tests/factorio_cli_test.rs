mod common;

use common::Workspace;
use nimbus::NimbusError;

#[tokio::test]
async fn test_nulius_solar_energy() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;

    let output = workspace
        .run(&["factorio", "nulius", "solar-energy", "5"])
        .await?;
    assert_eq!(
        output.trim(),
        "5x5 solar-panels-mk3 generate 19.80 MW with 2.3 exchangers-mk2"
    );

    let output = workspace
        .run(&["factorio", "nulius", "solar-energy", "3", "-s", "1", "-e", "3"])
        .await?;
    assert!(output.contains("3x3 solar-panels-mk1 generate 1.71 MW with 0.1 exchangers-mk3"));
    Ok(())
}

#[tokio::test]
async fn test_nulius_nuclear_energy() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;

    let output = workspace
        .run(&["factorio", "nulius", "nuclear-energy", "1"])
        .await?;
    assert_eq!(output.trim(), "2x1 reactors generate 150.00 MW with 7.5 exchanger-mk3");

    let output = workspace
        .run(&["factorio", "nulius", "nuclear-energy", "2", "--stirling"])
        .await?;
    assert!(output.contains("generate 400.00 MW"));
    assert!(output.contains("stirling-engine-mk3"));

    let output = workspace
        .run(&["factorio", "nulius", "nuclear-energy", "2", "-s"])
        .await?;
    assert_eq!(output.trim(), "2x2 reactors generate 400.00 MW with 50.0 stirling-engine-mk3");
    Ok(())
}

#[tokio::test]
async fn test_ultracube_nuclear() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;

    let output = workspace.run(&["factorio", "ultracube", "nuclear", "6"]).await?;
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines[0], "Reactors = 760.00 MW");
    assert_eq!(lines[1], "Exchangers = 76.00");
    assert_eq!(lines.last().copied(), Some("Generates 782.80 MW"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_arguments_are_rejected() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;

    let result = workspace.run(&["factorio", "nulius", "solar-energy", "1"]).await;
    assert!(matches!(result, Err(NimbusError::InvalidConfigValueError { .. })));

    let result = workspace
        .run(&["factorio", "nulius", "solar-energy", "4", "-s", "7"])
        .await;
    assert!(matches!(result, Err(NimbusError::InvalidConfigValueError { .. })));

    let result = workspace.run(&["factorio", "nulius", "wind-energy", "4"]).await;
    assert!(matches!(result, Err(NimbusError::CliError(_))));
    Ok(())
}
