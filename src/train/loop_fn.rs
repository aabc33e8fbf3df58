use tracing::{debug, info};

use crate::data::split::Partition;
use crate::eval::accuracy::accuracy;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::network::mlp::Mlp;
use crate::optim::adam::Adam;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `network` for `config.epochs` full-batch epochs and returns the
/// statistics of every epoch.
///
/// Each epoch runs one forward pass over the whole training partition, one
/// backward pass and one optimizer step. The test partition is only ever
/// used for inference.
pub fn train_loop(
    network: &mut Mlp,
    optimizer: &mut Adam,
    train: &Partition,
    test: &Partition,
    config: &TrainConfig,
) -> Vec<EpochStats> {
    let num_labels = network.spec().num_labels;
    let train_x = train.feature_matrix();
    let train_y = train.one_hot_labels(num_labels);
    let train_classes = train.classes();
    let test_x = test.feature_matrix();
    let test_classes = test.classes();

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let output = network.forward(&train_x);
        let loss = CrossEntropyLoss::loss(&output, &train_y);

        let grads = network.backward(&output, &train_y);
        optimizer.step(&mut network.layers, &grads);

        let train_accuracy = accuracy(&output.argmax_rows(), &train_classes);
        let test_accuracy = accuracy(&network.predict(&test_x), &test_classes);

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            loss,
            train_accuracy,
            test_accuracy,
        };

        if config.log_every > 0 && epoch % config.log_every == 0 {
            info!(
                "epoch {:03}, loss {:.4}, train acc {:.3}, test acc {:.3}",
                epoch, loss, train_accuracy, test_accuracy
            );
        } else {
            debug!(epoch, loss, train_accuracy, test_accuracy, "epoch done");
        }

        history.push(stats);
    }

    history
}
