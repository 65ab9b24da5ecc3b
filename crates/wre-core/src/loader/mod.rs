pub mod loader;
pub mod writer;

pub use loader::{ImageLoader, LoadedImage, IMAGE_MAGIC, IMAGE_VERSION};
pub use writer::ImageWriter;

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bytecode::{Address, BinOp, Block, Callee, Label, Op, Program, Reg, Transfer};
	use crate::capability::Capability;
	use crate::error::WreError;
	use crate::intrinsic::Intrinsic;

	fn sample() -> Program {
		Program::new(
			Label(0),
			vec![
				Block::new(
					vec![
						Op::LoadImm { dst: Reg(1), value: -5 },
						Op::Load { dst: Reg(2), addr: Address::Register(Reg(1)) },
						Op::Store { addr: Address::Absolute(40), src: Reg(2) },
						Op::Binary { op: BinOp::Ge, dst: Reg(3), lhs: Reg(1), rhs: Reg(2) },
						Op::LoadLabel { dst: Reg(4), label: Label(2) },
					],
					Transfer::Call { callee: Callee::Intrinsic(Intrinsic::ReadFloat), arg: Reg(1), resume: Label(1) },
				),
				Block::new(
					vec![Op::LoadStatus { dst: Reg(7) }],
					Transfer::Branch { cond: Reg(7), if_zero: Label(2), otherwise: Label(3) },
				),
				Block::new(vec![Op::LoadFrame { dst: Reg(0), offset: -2 }], Transfer::Return { value: Some(Reg(0)) }),
				Block::new(vec![], Transfer::Halt),
			],
		)
		.unwrap()
		.with_string(90, b"ok")
	}

	#[test]
	fn image_reloads_to_the_same_program() {
		let program = sample();
		let loaded = ImageLoader::load(&ImageWriter::encode(&program)).expect("load failed");
		assert_eq!(loaded.program, program);
		assert!(loaded.required.contains(Capability::Input));
		assert!(loaded.required.contains(Capability::Floats));
		assert!(!loaded.required.contains(Capability::Strings));
	}

	#[test]
	fn loader_rejects_bad_magic_and_version() {
		let mut image = ImageWriter::encode(&sample());
		image[4] = 9;
		assert!(matches!(ImageLoader::load(&image), Err(WreError::InvalidImageVersion(9))));
		image[0] = 0;
		assert!(matches!(ImageLoader::load(&image), Err(WreError::InvalidMagicNumber)));
	}

	#[test]
	fn loader_rejects_truncated_image() {
		let image = ImageWriter::encode(&sample());
		assert!(matches!(ImageLoader::load(&image[..10]), Err(WreError::ImageTooShort)));
		assert!(matches!(ImageLoader::load(&image[..image.len() - 1]), Err(WreError::ImageTooShort)));
	}

	#[test]
	fn loader_rejects_transfer_inside_ops() {
		let program = Program::new(Label(0), vec![Block::new(vec![], Transfer::Halt)]).unwrap();
		let mut image = ImageWriter::encode(&program);
		// claim one op, whose tag is Halt
		let count_at = image.len() - 5;
		image[count_at..count_at + 4].copy_from_slice(&1u32.to_be_bytes());
		image.push(0xFF);
		assert!(matches!(
			ImageLoader::load(&image),
			Err(WreError::InvalidTag { kind: "op", tag: 0xFF })
		));
	}

	#[test]
	fn loader_rejects_dangling_labels() {
		let program = Program::new(Label(0), vec![Block::new(vec![], Transfer::Halt)]).unwrap();
		let mut image = ImageWriter::encode(&program);
		// entry label lives right after magic, version, caps and reserved
		image[8..12].copy_from_slice(&4u32.to_be_bytes());
		assert!(matches!(ImageLoader::load(&image), Err(WreError::UnknownLabel(4))));
	}
}
